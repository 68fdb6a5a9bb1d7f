use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No input specified")]
    NoInput,

    #[error("Input and output should be different: {}", .0.display())]
    SameInputOutput(PathBuf),

    #[error("Input file does not exist: {}", .0.display())]
    MissingInput(PathBuf),
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}", describe_exit(.code))]
    Failed { program: String, code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error("Filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
