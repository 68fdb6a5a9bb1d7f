//! Path helpers for input/output resolution
//!
//! Resolution is purely lexical: the output file usually does not exist yet,
//! so nothing here touches the filesystem except `current_dir`.

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::Local;

use super::defaults::{OUTPUT_SUFFIX, TIMESTAMP_FORMAT};

/// Current local time formatted as `yyyy.mm.dd-HH.MM.ss`
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Make `path` absolute against the current directory and fold `.`/`..`
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize(path))
    } else {
        Ok(normalize(&std::env::current_dir()?.join(path)))
    }
}

/// Fold `.` and `..` components without consulting the filesystem
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Output path next to `input`: `<stem>-optimized-<timestamp><.ext>`.
/// Stem and extension keep their original bytes.
pub fn sibling_output(input: &Path, timestamp: &str) -> PathBuf {
    let mut name = OsString::new();
    if let Some(stem) = input.file_stem() {
        name.push(stem);
    }
    name.push(format!("-{}-{}", OUTPUT_SUFFIX, timestamp));
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

/// Output name used when reading from stdin: `optimized-<timestamp>.pdf`
pub fn stdin_output(timestamp: &str) -> PathBuf {
    PathBuf::from(format!("{}-{}.pdf", OUTPUT_SUFFIX, timestamp))
}
