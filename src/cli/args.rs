use clap::{ArgAction, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::defaults::{
    DEFAULT_COLOR_CONVERSION_STRATEGY, DEFAULT_COMPATIBILITY_LEVEL, DEFAULT_DPI, STDIO_MARKER,
};

#[derive(Parser, Debug)]
#[command(name = "gsx-pdf-optimize")]
#[command(
    author,
    version,
    about = "Shrink PDF files with a Ghostscript-compatible engine"
)]
pub struct Args {
    /// Input PDF file path ("-" reads from stdin)
    pub input: Option<PathBuf>,

    /// Output PDF file path (defaults to <input>-optimized-<timestamp>.pdf)
    pub output: Option<PathBuf>,

    /// Engine quality preset
    #[arg(short = 'P', long, value_enum, default_value = "screen")]
    pub preset: Preset,

    /// Image resampling resolution in DPI
    #[arg(short = 'D', long, default_value_t = DEFAULT_DPI)]
    pub dpi: u32,

    /// Suppress engine chatter (--no-quiet shows the engine command)
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1,
          require_equals = true, default_missing_value = "true")]
    pub quiet: bool,

    /// Engine executable (GSX_OPTIMIZE_COMMAND takes precedence) [default: gsx]
    #[arg(long)]
    pub command: Option<String>,

    /// Pipe the optimized PDF to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Read the PDF from stdin
    #[arg(long)]
    pub stdin: bool,

    /// PDF compatibility level of the output
    #[arg(long, alias = "compatibilityLevel", default_value_t = DEFAULT_COMPATIBILITY_LEVEL)]
    pub compatibility_level: f64,

    /// Subset embedded fonts
    #[arg(long, alias = "subsetFonts", default_value_t = true, action = ArgAction::Set, num_args = 0..=1,
          require_equals = true, default_missing_value = "true")]
    pub subset_fonts: bool,

    /// Compress embedded fonts
    #[arg(long, alias = "compressFonts", default_value_t = true, action = ArgAction::Set, num_args = 0..=1,
          require_equals = true, default_missing_value = "true")]
    pub compress_fonts: bool,

    /// Embed all fonts, including the standard 14
    #[arg(long, alias = "embedAllFonts", default_value_t = true, action = ArgAction::Set, num_args = 0..=1,
          require_equals = true, default_missing_value = "true")]
    pub embed_all_fonts: bool,

    /// Color conversion strategy for the document and its images
    #[arg(long, alias = "colorConversionStrategy", default_value = DEFAULT_COLOR_CONVERSION_STRATEGY)]
    pub color_conversion_strategy: String,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Engine quality/size preset (-dPDFSETTINGS)
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum Preset {
    /// Low resolution, smallest output
    #[default]
    Screen,
    /// Medium resolution
    Ebook,
    /// High resolution for printing
    Printer,
    /// Prepress quality, color preserving
    Prepress,
}

impl Preset {
    /// Name as the engine spells it after the slash
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Screen => "screen",
            Preset::Ebook => "ebook",
            Preset::Printer => "printer",
            Preset::Prepress => "prepress",
        }
    }
}

/// Boolean options, by kebab-case name and camelCase alias
const BOOLEAN_FLAGS: &[(&str, &str)] = &[
    ("quiet", "quiet"),
    ("subset-fonts", "subsetFonts"),
    ("compress-fonts", "compressFonts"),
    ("embed-all-fonts", "embedAllFonts"),
];

fn is_boolean_flag(name: &str) -> bool {
    BOOLEAN_FLAGS
        .iter()
        .any(|(kebab, camel)| name == *kebab || name == *camel)
}

/// Rewrite boolean options into the `--flag=value` form clap expects.
///
/// `--quiet false` becomes `--quiet=false` (only an exact `true`/`false`
/// token is taken as the value) and `--no-quiet` becomes `--quiet=false`.
/// Everything after `--` is left alone.
pub fn normalize_boolean_flags<I, T>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut argv = argv.into_iter().map(Into::into).peekable();

    while let Some(arg) = argv.next() {
        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };

        if text == "--" {
            out.push(arg);
            out.extend(argv);
            break;
        }

        if let Some(name) = text.strip_prefix("--no-").filter(|n| is_boolean_flag(n)) {
            out.push(format!("--{}=false", name).into());
            continue;
        }

        if let Some(name) = text.strip_prefix("--").filter(|n| is_boolean_flag(n)) {
            let flag = format!("--{}", name);
            match argv.next_if(|next| next == "true" || next == "false") {
                Some(value) => out.push(format!("{}={}", flag, value.to_string_lossy()).into()),
                None => out.push(flag.into()),
            }
            continue;
        }

        out.push(arg);
    }

    out
}

impl Args {
    /// Parse the process arguments, accepting `--flag true|false` and `--no-flag`
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_boolean_flags(std::env::args_os()))
    }

    /// Fallible parse of `argv` (program name first), with the same boolean handling
    pub fn try_parse_args<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_boolean_flags(argv))
    }

    /// Check if the document comes from stdin, either via --stdin or "-"
    pub fn stdin_requested(&self) -> bool {
        self.stdin
            || self
                .input
                .as_ref()
                .map(|p| p.as_os_str() == STDIO_MARKER)
                .unwrap_or(false)
    }

    /// Log level from -v, raised to info when not quiet
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 if !self.quiet => log::LevelFilter::Info,
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}
