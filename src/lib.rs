pub mod cli;
pub mod config;
pub mod engine;
pub mod error;

use std::process::Child;

pub use cli::Preset;
pub use config::{Job, Settings, Sink, Source};
pub use engine::Invocation;
pub use error::{ConfigError, OptimizeError, ProcessError};

/// Optimize a PDF with the external engine and wait for it to finish.
///
/// This is the recommended entry point for library consumers. The settings
/// are resolved first (default output name, path checks, output directory),
/// so configuration errors surface before anything is spawned. The engine
/// runs with inherited stdio.
///
/// Returns the resolved [`Job`], which tells where the output went.
///
/// # Example
///
/// ```no_run
/// use gsx_pdf_optimize::{optimize, Preset, Settings};
///
/// let settings = Settings {
///     preset: Preset::Ebook,
///     dpi: 150,
///     ..Settings::for_input("scan.pdf")
/// };
///
/// let job = optimize(&settings).unwrap();
/// println!("{:?}", job.sink());
/// ```
pub fn optimize(settings: &Settings) -> Result<Job, OptimizeError> {
    let job = settings.resolve()?;
    let invocation = job.invocation();

    if !settings.quiet {
        log::info!("{}", invocation);
    }

    engine::run(&invocation)?;
    Ok(job)
}

/// Start the engine without waiting, with stdin, stdout and stderr piped.
///
/// No path resolution happens here: a missing input reads stdin and a
/// missing output (or `stdout: true`) writes the PDF to the child's stdout.
pub fn spawn(settings: &Settings) -> Result<Child, OptimizeError> {
    let invocation = build(settings);
    Ok(engine::spawn(&invocation)?)
}

/// Engine invocation for `settings`, without running it
pub fn build(settings: &Settings) -> Invocation {
    engine::build(settings)
}
