/// Default PDF compatibility level passed to the engine
pub const DEFAULT_COMPATIBILITY_LEVEL: f64 = 1.5;

/// Default downsampling resolution for color, gray and mono images
pub const DEFAULT_DPI: u32 = 300;

/// Default color conversion strategy for documents and images
pub const DEFAULT_COLOR_CONVERSION_STRATEGY: &str = "RGB";

/// Engine executable used when nothing else is configured
pub const DEFAULT_COMMAND: &str = "gsx";

/// Environment variable that overrides the engine executable
pub const COMMAND_ENV_VAR: &str = "GSX_OPTIMIZE_COMMAND";

/// chrono format for the timestamp inserted into generated output names
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d-%H.%M.%S";

/// Marker inserted between the input stem and the timestamp
pub const OUTPUT_SUFFIX: &str = "optimized";

/// Argument token standing for stdin/stdout
pub const STDIO_MARKER: &str = "-";
