//! Text-level refactoring passes over C# source trees.
//!
//! `namespace` and `required` hold the pure text logic. The drivers here own
//! all file I/O and progress logging: they walk the tree, read each file
//! whole, transform it in memory, and write it back only when it changed and
//! writing was requested. A failure on one file is recorded and the run
//! carries on with the next.

pub mod namespace;
pub mod required;

pub use namespace::{
    convert_namespace, detect_namespace, find_declaration, Conversion, NamespaceDeclaration,
    NamespaceStyle,
};
pub use required::{contains_required_property, find_required_properties, RequiredProperty};

use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::utils::{io, paths};
use crate::walk;

// ============================================================================
// Types
// ============================================================================

/// Why a file was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnchangedReason {
    NoDeclaration,
    AlreadyBraced,
    /// File-scoped, but the name is dotted (`A.B;`) and is not rewritten.
    QualifiedName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Converted {
        namespace: String,
        line: usize,
        closer_appended: bool,
    },
    Unchanged {
        reason: UnchangedReason,
    },
}

/// Outcome for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileConversion {
    /// File path relative to root.
    pub file: String,
    #[serde(flatten)]
    pub outcome: ConversionOutcome,
    /// Whether new content was written to disk.
    pub written: bool,
}

impl FileConversion {
    pub fn is_converted(&self) -> bool {
        matches!(self.outcome, ConversionOutcome::Converted { .. })
    }
}

/// A file that could not be read or written.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub code: String,
    pub message: String,
    pub details: Value,
}

impl FileFailure {
    fn from_error(file: String, err: &Error) -> Self {
        Self {
            file,
            code: err.code.as_str().to_string(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NamespaceReport {
    pub root: String,
    pub extension: String,
    pub dry_run: bool,
    pub files: Vec<FileConversion>,
    pub failures: Vec<FileFailure>,
    pub total_files: usize,
    pub converted: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Whether changes were written to disk.
    pub applied: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequiredFileMatches {
    pub file: String,
    pub properties: Vec<RequiredProperty>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequiredReport {
    pub root: String,
    pub extension: String,
    /// Top-level project directories under the root.
    pub directories: Vec<String>,
    pub files: Vec<RequiredFileMatches>,
    /// Root-relative paths of scanned files with no match.
    pub files_without_required: Vec<String>,
    pub failures: Vec<FileFailure>,
    pub total_files: usize,
    pub files_with_required: usize,
    pub total_properties: usize,
    pub failed: usize,
}

// ============================================================================
// Namespace conversion driver
// ============================================================================

/// Convert one file. Reads it whole, then writes it whole only when a
/// declaration was converted and `write` is set.
pub fn convert_file(path: &Path, root: &Path, write: bool) -> Result<FileConversion> {
    let file = paths::relative_display(path, root);
    let content = io::read_file(path, &format!("read {}", path.display()))?;

    let Some(conversion) = convert_namespace(&content) else {
        return Ok(FileConversion {
            file,
            outcome: ConversionOutcome::Unchanged {
                reason: unchanged_reason(&content),
            },
            written: false,
        });
    };

    if write {
        io::write_file(path, &conversion.content, &format!("write {}", path.display()))?;
    }

    Ok(FileConversion {
        file,
        outcome: ConversionOutcome::Converted {
            namespace: conversion.declaration.name,
            line: conversion.declaration.line,
            closer_appended: conversion.closer_appended,
        },
        written: write,
    })
}

fn unchanged_reason(content: &str) -> UnchangedReason {
    match find_declaration(content) {
        None => UnchangedReason::NoDeclaration,
        Some(decl) if decl.style == NamespaceStyle::Braced => UnchangedReason::AlreadyBraced,
        Some(_) => UnchangedReason::QualifiedName,
    }
}

/// Convert every matching file under `root`.
pub fn convert_tree(root: &Path, config: &ScanConfig, write: bool) -> Result<NamespaceReport> {
    let files = walk::source_files(root, config)?;
    log_status!(
        "namespace",
        "Found {} .{} files under {}",
        files.len(),
        config.extension,
        root.display()
    );
    Ok(convert_files(root, &files, &config.extension, write))
}

/// Convert a single file; paths in the report are relative to its directory.
pub fn convert_single(path: &Path, write: bool) -> Result<NamespaceReport> {
    paths::require_file(path, "file")?;
    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(convert_files(&root, &[path.to_path_buf()], &extension, write))
}

fn convert_files(root: &Path, files: &[PathBuf], extension: &str, write: bool) -> NamespaceReport {
    let mut conversions = Vec::new();
    let mut failures = Vec::new();

    for path in files {
        match convert_file(path, root, write) {
            Ok(conversion) => {
                match &conversion.outcome {
                    ConversionOutcome::Converted { namespace, .. } => {
                        let verb = if write { "Converted" } else { "Would convert" };
                        log_status!("namespace", "{} {} ({})", verb, conversion.file, namespace);
                    }
                    ConversionOutcome::Unchanged { .. } => {
                        log_status!("namespace", "No file-scoped namespace in {}", conversion.file);
                    }
                }
                conversions.push(conversion);
            }
            Err(err) => {
                let file = paths::relative_display(path, root);
                log_status!("namespace", "Failed {}: {}", file, err);
                failures.push(FileFailure::from_error(file, &err));
            }
        }
    }

    let converted = conversions.iter().filter(|c| c.is_converted()).count();

    NamespaceReport {
        root: root.display().to_string(),
        extension: extension.to_string(),
        dry_run: !write,
        total_files: files.len(),
        converted,
        unchanged: conversions.len() - converted,
        failed: failures.len(),
        files: conversions,
        failures,
        applied: write,
    }
}

// ============================================================================
// Required property scan driver
// ============================================================================

/// Find `required` property declarations in every matching file under `root`.
pub fn scan_tree(root: &Path, config: &ScanConfig) -> Result<RequiredReport> {
    let directories = walk::project_directories(root, config)?;
    for dir in &directories {
        log_status!("required", "Scanning directory: {}", dir);
    }

    let files = walk::source_files(root, config)?;
    let mut matches = Vec::new();
    let mut without = Vec::new();
    let mut failures = Vec::new();

    for path in &files {
        let file = paths::relative_display(path, root);
        match io::read_file(path, &format!("read {}", path.display())) {
            Ok(content) => {
                let properties = find_required_properties(&content);
                if properties.is_empty() {
                    log_status!("required", "No required properties in: {}", file);
                    without.push(file);
                } else {
                    log_status!("required", "Required property found in: {}", file);
                    matches.push(RequiredFileMatches { file, properties });
                }
            }
            Err(err) => {
                log_status!("required", "Failed {}: {}", file, err);
                failures.push(FileFailure::from_error(file, &err));
            }
        }
    }

    let total_properties = matches.iter().map(|m| m.properties.len()).sum();

    Ok(RequiredReport {
        root: root.display().to_string(),
        extension: config.extension.clone(),
        directories,
        total_files: files.len(),
        files_with_required: matches.len(),
        total_properties,
        failed: failures.len(),
        files: matches,
        files_without_required: without,
        failures,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn convert_file_dry_run_leaves_disk_untouched() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "Foo.cs", "namespace Foo;\nint x;\n");

        let result = convert_file(&path, dir.path(), false).unwrap();

        assert!(result.is_converted());
        assert!(!result.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "namespace Foo;\nint x;\n");
    }

    #[test]
    fn convert_file_writes_when_requested() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "Foo.cs", "namespace Foo;\nint x;\n");

        let result = convert_file(&path, dir.path(), true).unwrap();

        assert!(result.written);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "namespace Foo\n{\nint x;\n}\n"
        );
    }

    #[test]
    fn convert_file_reports_reason_for_unchanged() {
        let dir = TempDir::new().unwrap();
        let braced = write(dir.path(), "A.cs", "namespace A\n{\n}\n");
        let dotted = write(dir.path(), "B.cs", "namespace A.B;\n");
        let none = write(dir.path(), "C.cs", "class C {}\n");

        let reason = |path: &Path| match convert_file(path, dir.path(), true).unwrap().outcome {
            ConversionOutcome::Unchanged { reason } => reason,
            other => panic!("expected unchanged, got {:?}", other),
        };

        assert_eq!(reason(&braced), UnchangedReason::AlreadyBraced);
        assert_eq!(reason(&dotted), UnchangedReason::QualifiedName);
        assert_eq!(reason(&none), UnchangedReason::NoDeclaration);
    }

    #[test]
    fn convert_tree_isolates_failing_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/Good.cs", "namespace Good;\nint x;\n");
        let bad = dir.path().join("src/Bad.cs");
        fs::write(&bad, [0xff, 0xfe, 0x6e]).unwrap();

        let report = convert_tree(dir.path(), &ScanConfig::default(), true).unwrap();

        assert_eq!(report.total_files, 2);
        assert_eq!(report.converted, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].file, "src/Bad.cs");
        assert_eq!(report.failures[0].code, "file.decode_failed");
        assert_eq!(
            fs::read_to_string(dir.path().join("src/Good.cs")).unwrap(),
            "namespace Good\n{\nint x;\n}\n"
        );
    }

    #[test]
    fn convert_single_uses_parent_as_root() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "LlmTornado/Assistants/AssistantFileResponse.cs",
            "namespace Assistants;\npublic class AssistantFileResponse\n{\n}\n",
        );

        let report = convert_single(&path, false).unwrap();

        assert_eq!(report.total_files, 1);
        assert_eq!(report.files[0].file, "AssistantFileResponse.cs");
        assert_eq!(report.extension, "cs");
        assert!(report.dry_run);
    }

    #[test]
    fn convert_single_rejects_missing_file() {
        let err = convert_single(Path::new("/nonexistent/Foo.cs"), false).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn scan_tree_collects_matches_per_file() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "LlmTornado/Threads/ToolOutput.cs",
            "public class ToolOutput\n{\n    public required string ToolCallId { get; set; }\n    public required string Output { get; set; }\n}\n",
        );
        write(dir.path(), "LlmTornado/TornadoApi.cs", "public class TornadoApi {}\n");

        let report = scan_tree(dir.path(), &ScanConfig::default()).unwrap();

        assert_eq!(report.directories, vec!["LlmTornado"]);
        assert_eq!(report.total_files, 2);
        assert_eq!(report.files_with_required, 1);
        assert_eq!(report.total_properties, 2);
        assert_eq!(report.files[0].file, "LlmTornado/Threads/ToolOutput.cs");
        assert_eq!(report.files_without_required, vec!["LlmTornado/TornadoApi.cs"]);
    }

    #[cfg(unix)]
    #[test]
    fn convert_tree_visits_each_file_once_despite_symlink_loop() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "App/Foo.cs", "namespace Foo;
int x;
");
        std::os::unix::fs::symlink(dir.path(), dir.path().join("App/loop")).unwrap();

        let report = convert_tree(dir.path(), &ScanConfig::default(), true).unwrap();

        assert_eq!(report.total_files, 1);
        assert_eq!(report.converted, 1);
        assert_eq!(report.unchanged, 0);
    }
}
