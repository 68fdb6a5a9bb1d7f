//! pdfwrite argument vector
//!
//! Turns [`Settings`] into the exact flag list the engine expects. Nothing
//! here touches the filesystem or spawns anything.

use std::fmt;
use std::path::Path;

use crate::config::defaults::{COMMAND_ENV_VAR, DEFAULT_COMMAND, STDIO_MARKER};
use crate::config::{Settings, Sink, Source};

/// A program name plus its ordered arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Pick the engine executable: environment, then configuration, then default.
/// Empty values count as unset.
pub fn resolve_program(env_override: Option<String>, configured: Option<&str>) -> String {
    env_override
        .filter(|s| !s.is_empty())
        .or_else(|| configured.filter(|s| !s.is_empty()).map(String::from))
        .unwrap_or_else(|| DEFAULT_COMMAND.to_string())
}

/// Current value of the engine override variable
pub fn env_override() -> Option<String> {
    std::env::var(COMMAND_ENV_VAR).ok()
}

/// Double-quote a path using JSON string escaping
fn quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\u{08}' => quoted.push_str("\\b"),
            '\u{0c}' => quoted.push_str("\\f"),
            c if (c as u32) < 0x20 => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Build the engine invocation for `settings`.
///
/// Unresolved settings are accepted: a missing input reads stdin and a
/// missing output writes stdout.
pub fn build(settings: &Settings) -> Invocation {
    build_with(settings, env_override())
}

/// Like [`build`], with the environment override passed in instead of read
pub fn build_with(settings: &Settings, env_override: Option<String>) -> Invocation {
    let dpi = settings.dpi;
    let strategy = &settings.color_conversion_strategy;

    let output_file = match settings.sink() {
        Sink::Stdout => STDIO_MARKER.to_string(),
        Sink::File(path) => quote(&path),
    };
    let input_file = match settings.source() {
        Source::Stdin => STDIO_MARKER.to_string(),
        Source::File(path) => quote(&path),
    };

    let mut args = vec![
        "-sDEVICE=pdfwrite".to_string(),
        format!("-dPDFSETTINGS=/{}", settings.preset.as_str()),
        "-dNOPAUSE".to_string(),
    ];
    if settings.quiet {
        args.push("-dQUIET".to_string());
    }
    args.extend([
        "-dBATCH".to_string(),
        format!("-dCompatibilityLevel={}", settings.compatibility_level),
        // fonts
        format!("-dSubsetFonts={}", settings.subset_fonts),
        format!("-dCompressFonts={}", settings.compress_fonts),
        format!("-dEmbedAllFonts={}", settings.embed_all_fonts),
        // color
        "-sProcessColorModel=DeviceRGB".to_string(),
        format!("-sColorConversionStrategy={}", strategy),
        format!("-sColorConversionStrategyForImages={}", strategy),
        "-dConvertCMYKImagesToRGB=true".to_string(),
        // image resampling
        "-dDetectDuplicateImages=true".to_string(),
        "-dColorImageDownsampleType=/Bicubic".to_string(),
        format!("-dColorImageResolution={}", dpi),
        "-dGrayImageDownsampleType=/Bicubic".to_string(),
        format!("-dGrayImageResolution={}", dpi),
        "-dMonoImageDownsampleType=/Bicubic".to_string(),
        format!("-dMonoImageResolution={}", dpi),
        "-dDownsampleColorImages=true".to_string(),
        // everything else
        "-dDoThumbnails=false".to_string(),
        "-dCreateJobTicket=false".to_string(),
        "-dPreserveEPSInfo=false".to_string(),
        "-dPreserveOPIComments=false".to_string(),
        "-dPreserveOverprintSettings=false".to_string(),
        "-dUCRandBGInfo=/Remove".to_string(),
        format!("-sOutputFile={}", output_file),
        input_file,
    ]);

    Invocation {
        program: resolve_program(env_override, settings.command.as_deref()),
        args,
    }
}
