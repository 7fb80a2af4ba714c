//! Path argument handling: tilde expansion, existence checks, display.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Expand a leading `~` and return an owned path.
pub fn expand(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}

/// Require `path` to be an existing directory.
pub fn require_dir(path: &Path, field: &str) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    let problem = if path.exists() {
        format!("'{}' is not a directory", path.display())
    } else {
        format!("Directory '{}' does not exist", path.display())
    };

    Err(Error::validation_invalid_argument(field, problem, None, None)
        .with_hint("Pass an existing source directory, or omit it to use the current directory"))
}

/// Require `path` to be an existing regular file.
pub fn require_file(path: &Path, field: &str) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }

    Err(Error::validation_invalid_argument(
        field,
        format!("File '{}' does not exist", path.display()),
        None,
        None,
    ))
}

/// Path relative to `root` for reports, falling back to the full path.
pub fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
