use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{Args, Preset};
use crate::engine::{self, Invocation};
use crate::error::{ConfigError, OptimizeError};

use super::defaults::*;
use super::paths::{absolutize, sibling_output, stdin_output, timestamp};

/// Optimizer configuration.
///
/// A `Settings` value may be partial: input and output are optional until
/// [`Settings::resolve`] turns it into a [`Job`].
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Input PDF (None when reading from stdin)
    pub input: Option<PathBuf>,
    /// Output PDF (None lets resolution pick a name, or means stdout)
    pub output: Option<PathBuf>,
    /// Feed the engine from stdin instead of the input file
    pub stdin: bool,
    /// Let the engine write to stdout instead of a file
    pub stdout: bool,

    pub compatibility_level: f64,
    pub compress_fonts: bool,
    pub embed_all_fonts: bool,
    pub subset_fonts: bool,
    /// Target resolution for downsampled images
    pub dpi: u32,
    /// Pass -dQUIET and keep the command line out of the log
    pub quiet: bool,
    pub preset: Preset,
    pub color_conversion_strategy: String,

    /// Engine executable; the environment override still wins
    pub command: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            stdin: false,
            stdout: false,
            compatibility_level: DEFAULT_COMPATIBILITY_LEVEL,
            compress_fonts: true,
            embed_all_fonts: true,
            subset_fonts: true,
            dpi: DEFAULT_DPI,
            quiet: true,
            preset: Preset::default(),
            color_conversion_strategy: DEFAULT_COLOR_CONVERSION_STRATEGY.to_string(),
            command: None,
        }
    }
}

/// Where the engine reads the document from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

/// Where the engine writes the optimized document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

fn is_stdio_marker(path: &Path) -> bool {
    path.as_os_str() == STDIO_MARKER
}

impl Settings {
    /// Settings for optimizing `input` with every other option at its default
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        Self {
            input: Some(input.into()),
            ..Default::default()
        }
    }

    /// Create settings from CLI arguments
    pub fn from_args(args: &Args) -> Self {
        Self {
            input: args.input.clone().filter(|p| !is_stdio_marker(p)),
            output: args.output.clone(),
            stdin: args.stdin_requested(),
            stdout: args.stdout,
            compatibility_level: args.compatibility_level,
            compress_fonts: args.compress_fonts,
            embed_all_fonts: args.embed_all_fonts,
            subset_fonts: args.subset_fonts,
            dpi: args.dpi,
            quiet: args.quiet,
            preset: args.preset,
            color_conversion_strategy: args.color_conversion_strategy.clone(),
            command: args.command.clone(),
        }
    }

    /// Input as seen by the engine. A missing input or `-` means stdin.
    pub fn source(&self) -> Source {
        match &self.input {
            Some(path) if !self.stdin && !is_stdio_marker(path) => Source::File(path.clone()),
            _ => Source::Stdin,
        }
    }

    /// Output as seen by the engine. A missing output or `-` means stdout.
    pub fn sink(&self) -> Sink {
        match &self.output {
            Some(path) if !self.stdout && !is_stdio_marker(path) => Sink::File(path.clone()),
            _ => Sink::Stdout,
        }
    }

    /// Resolve paths against the current time. See [`Settings::resolve_at`].
    pub fn resolve(&self) -> Result<Job, OptimizeError> {
        self.resolve_at(&timestamp())
    }

    /// Validate the configuration and fill in default paths.
    ///
    /// Paths become absolute. Without an output, one is synthesized next to
    /// the input (or in the current directory when reading stdin) using
    /// `timestamp`. The output directory is created unless writing to stdout.
    pub fn resolve_at(&self, timestamp: &str) -> Result<Job, OptimizeError> {
        // `-` on either side is the same as the stdin/stdout flags
        let input = self.input.as_deref().filter(|p| !is_stdio_marker(p));
        let output = self.output.as_deref().filter(|p| !is_stdio_marker(p));
        let stdin = self.stdin || (self.input.is_some() && input.is_none());
        let stdout = self.stdout || (self.output.is_some() && output.is_none());

        if !stdin && input.is_none() {
            return Err(ConfigError::NoInput.into());
        }

        let input = input.map(absolute).transpose()?;

        let output = match (output, &input) {
            (Some(path), _) => Some(absolute(path)?),
            (None, _) if stdout => None,
            (None, Some(input)) => Some(sibling_output(input, timestamp)),
            (None, None) => Some(absolute(&stdin_output(timestamp))?),
        };

        if let (Some(input), Some(output)) = (&input, &output) {
            if input == output {
                return Err(ConfigError::SameInputOutput(input.clone()).into());
            }
        }

        if !stdin {
            if let Some(input) = &input {
                if !input.exists() {
                    return Err(ConfigError::MissingInput(input.clone()).into());
                }
            }
        }

        if !stdout {
            if let Some(dir) = output.as_deref().and_then(Path::parent) {
                fs::create_dir_all(dir).map_err(|source| OptimizeError::Filesystem {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }

        let settings = Settings {
            input,
            output,
            stdin,
            stdout,
            ..self.clone()
        };
        log::debug!(
            "Resolved source {:?} and sink {:?}",
            settings.source(),
            settings.sink()
        );

        Ok(Job { settings })
    }
}

fn absolute(path: &Path) -> Result<PathBuf, OptimizeError> {
    absolutize(path).map_err(|source| OptimizeError::Filesystem {
        path: path.to_path_buf(),
        source,
    })
}

/// A validated configuration with absolute input and output paths
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    settings: Settings,
}

impl Job {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn source(&self) -> Source {
        self.settings.source()
    }

    pub fn sink(&self) -> Sink {
        self.settings.sink()
    }

    /// Engine command line for this job
    pub fn invocation(&self) -> Invocation {
        engine::build(&self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    const TS: &str = "2024.03.09-14.05.59";

    fn sample_pdf(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"%PDF-1.4\n").unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.compatibility_level, 1.5);
        assert_eq!(settings.dpi, 300);
        assert!(settings.quiet);
        assert!(settings.subset_fonts && settings.compress_fonts && settings.embed_all_fonts);
        assert_eq!(settings.preset, Preset::Screen);
        assert_eq!(settings.color_conversion_strategy, "RGB");
        assert_eq!(settings.source(), Source::Stdin);
        assert_eq!(settings.sink(), Sink::Stdout);
    }

    #[test]
    fn test_output_defaults_next_to_input() {
        let dir = TempDir::new().unwrap();
        let input = sample_pdf(&dir, "a.pdf");

        let job = Settings::for_input(&input).resolve_at(TS).unwrap();

        assert_eq!(job.source(), Source::File(input));
        assert_eq!(
            job.sink(),
            Sink::File(dir.path().join(format!("a-optimized-{}.pdf", TS)))
        );
    }

    #[test]
    fn test_no_input_fails() {
        let err = Settings::default().resolve_at(TS).unwrap_err();
        assert!(matches!(err, OptimizeError::Config(ConfigError::NoInput)));
    }

    #[test]
    fn test_same_input_and_output_fails() {
        let dir = TempDir::new().unwrap();
        let input = sample_pdf(&dir, "a.pdf");
        let settings = Settings {
            output: Some(dir.path().join("sub/../a.pdf")),
            ..Settings::for_input(&input)
        };

        let err = settings.resolve_at(TS).unwrap_err();
        assert!(matches!(
            err,
            OptimizeError::Config(ConfigError::SameInputOutput(ref p)) if *p == input
        ));
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_input(dir.path().join("missing.pdf"));

        let err = settings.resolve_at(TS).unwrap_err();
        assert!(matches!(
            err,
            OptimizeError::Config(ConfigError::MissingInput(_))
        ));
    }

    #[test]
    fn test_stdin_skips_existence_check() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            stdin: true,
            output: Some(dir.path().join("out.pdf")),
            ..Default::default()
        };

        let job = settings.resolve_at(TS).unwrap();
        assert_eq!(job.source(), Source::Stdin);
        assert_eq!(job.sink(), Sink::File(dir.path().join("out.pdf")));
    }

    #[test]
    fn test_stdin_without_output_uses_current_dir() {
        let settings = Settings {
            stdin: true,
            stdout: false,
            ..Default::default()
        };

        let job = settings.resolve_at(TS).unwrap();
        let expected = std::env::current_dir()
            .unwrap()
            .join(format!("optimized-{}.pdf", TS));
        assert_eq!(job.sink(), Sink::File(expected));
    }

    #[test]
    fn test_stdout_without_output_synthesizes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = sample_pdf(&dir, "a.pdf");
        let settings = Settings {
            stdout: true,
            ..Settings::for_input(&input)
        };

        let job = settings.resolve_at(TS).unwrap();
        assert_eq!(job.sink(), Sink::Stdout);
        assert_eq!(job.settings().output, None);
    }

    #[test]
    fn test_creates_output_directory() {
        let dir = TempDir::new().unwrap();
        let input = sample_pdf(&dir, "a.pdf");
        let nested = dir.path().join("x/y/z");
        let settings = Settings {
            output: Some(nested.join("out.pdf")),
            ..Settings::for_input(&input)
        };

        settings.resolve_at(TS).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_stdout_does_not_create_output_directory() {
        let dir = TempDir::new().unwrap();
        let input = sample_pdf(&dir, "a.pdf");
        let nested = dir.path().join("never");
        let settings = Settings {
            output: Some(nested.join("out.pdf")),
            stdout: true,
            ..Settings::for_input(&input)
        };

        let job = settings.resolve_at(TS).unwrap();
        assert_eq!(job.sink(), Sink::Stdout);
        assert!(!nested.exists());
    }

    #[test]
    fn test_dash_resolves_as_stdio() {
        let settings = Settings {
            input: Some(PathBuf::from("-")),
            output: Some(PathBuf::from("-")),
            ..Default::default()
        };

        let job = settings.resolve_at(TS).unwrap();
        assert_eq!(job.source(), Source::Stdin);
        assert_eq!(job.sink(), Sink::Stdout);
        assert!(job.settings().stdin && job.settings().stdout);
    }

    #[test]
    fn test_dash_means_stdio() {
        let settings = Settings {
            input: Some(PathBuf::from("-")),
            output: Some(PathBuf::from("-")),
            ..Default::default()
        };
        assert_eq!(settings.source(), Source::Stdin);
        assert_eq!(settings.sink(), Sink::Stdout);
    }

    #[test]
    fn test_from_args() {
        let args = Args::try_parse_from([
            "gsx-pdf-optimize",
            "-",
            "out.pdf",
            "-D",
            "96",
            "--embed-all-fonts=false",
            "--command",
            "gs",
        ])
        .unwrap();

        let settings = Settings::from_args(&args);
        assert_eq!(settings.input, None);
        assert!(settings.stdin);
        assert_eq!(settings.output, Some(PathBuf::from("out.pdf")));
        assert_eq!(settings.dpi, 96);
        assert!(!settings.embed_all_fonts);
        assert_eq!(settings.command.as_deref(), Some("gs"));
        assert_eq!(settings.source(), Source::Stdin);
    }
}
