//! Engine process launching
//!
//! One process per call, no retries. Errors come back exactly as they
//! happened.

use std::process::{Child, Command, Stdio};

use crate::error::ProcessError;

use super::Invocation;

impl Invocation {
    /// `std::process::Command` for this invocation, stdio left at defaults
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

/// Start the engine with piped stdin, stdout and stderr and return without
/// waiting. The caller owns the child and is responsible for reaping it.
pub fn spawn(invocation: &Invocation) -> Result<Child, ProcessError> {
    log::debug!("Spawning {}", invocation);

    invocation
        .command()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: invocation.program.clone(),
            source,
        })
}

/// Run the engine to completion with inherited stdio.
///
/// A non-zero exit status is an error.
pub fn run(invocation: &Invocation) -> Result<(), ProcessError> {
    log::debug!("Running {}", invocation);

    let mut child = invocation
        .command()
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| ProcessError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

    let status = child.wait().map_err(|source| ProcessError::Wait {
        program: invocation.program.clone(),
        source,
    })?;

    if !status.success() {
        log::warn!("{} failed with {}", invocation.program, status);
        return Err(ProcessError::Failed {
            program: invocation.program.clone(),
            code: status.code(),
        });
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Read;

    fn invocation(program: &str, args: &[&str]) -> Invocation {
        Invocation {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_run_success() {
        run(&invocation("true", &["-dBATCH"])).unwrap();
    }

    #[test]
    fn test_run_non_zero_exit() {
        let err = run(&invocation("false", &[])).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Failed { code: Some(1), ref program } if program == "false"
        ));
    }

    #[test]
    fn test_run_missing_binary() {
        let err = run(&invocation("gsx-definitely-not-installed", &[])).unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[test]
    fn test_spawn_pipes_stdout() {
        let mut child = spawn(&invocation("echo", &["-sOutputFile=-", "-"])).unwrap();
        let mut out = String::new();
        child
            .stdout
            .take()
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        assert!(child.wait().unwrap().success());
        assert_eq!(out.trim_end(), "-sOutputFile=- -");
        assert!(child.stderr.is_some());
    }

    #[test]
    fn test_spawn_missing_binary() {
        let err = spawn(&invocation("gsx-definitely-not-installed", &[])).unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }
}
