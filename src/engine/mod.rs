mod flags;
mod launcher;

pub use flags::{build, build_with, env_override, resolve_program, Invocation};
pub use launcher::{run, spawn};
