//! Source tree enumeration.
//!
//! Recursively collects files carrying the configured extension, skipping
//! VCS/build directories by name at any depth and anything matched by the
//! exclude globs. Results are sorted so runs are reproducible.

use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::error::Result;
use crate::utils::paths;

/// Every matching source file under `root`, sorted by path.
pub fn source_files(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    paths::require_dir(root, "path")?;

    let mut files = Vec::new();
    walk_recursive(root, root, config, &mut files);
    files.sort();
    Ok(files)
}

/// Immediate subdirectories of `root` that a scan will descend into.
pub fn project_directories(root: &Path, config: &ScanConfig) -> Result<Vec<String>> {
    paths::require_dir(root, "path")?;

    let Ok(entries) = std::fs::read_dir(root) else {
        return Ok(Vec::new());
    };

    let mut dirs: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| !config.is_skipped_dir(name) && !config.is_excluded(name))
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn walk_recursive(dir: &Path, root: &Path, config: &ScanConfig, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let relative = paths::relative_display(&path, root);
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        // Directory symlinks are not followed; file symlinks are.
        if file_type.is_symlink() && path.is_dir() {
            continue;
        }

        if file_type.is_dir() {
            let name = entry.file_name().to_string_lossy().to_string();
            if config.is_skipped_dir(&name) || config.is_excluded(&relative) {
                continue;
            }
            walk_recursive(&path, root, config, files);
        } else if config.matches_extension(&path) && !config.is_excluded(&relative) {
            files.push(path);
        }
    }
}
