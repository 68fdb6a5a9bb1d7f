use anyhow::{Context, Result};

use gsx_pdf_optimize::cli::Args;
use gsx_pdf_optimize::config::{Settings, Sink};
use gsx_pdf_optimize::optimize;

fn main() -> Result<()> {
    let args = Args::parse_args();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level())
        .init();

    let settings = Settings::from_args(&args);

    let job = optimize(&settings).with_context(|| "Failed to optimize PDF")?;

    if let Sink::File(path) = job.sink() {
        log::info!("Wrote optimized PDF to {}", path.display());
    }

    Ok(())
}
