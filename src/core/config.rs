use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::io;

/// Name of the optional per-tree config file, looked up in the scan root.
pub const CONFIG_FILE: &str = "csrefactor.json";

/// Which files a refactoring pass visits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// File extension to match, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directory names skipped at any depth.
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Glob patterns matched against root-relative paths.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            skip_dirs: default_skip_dirs(),
            exclude: Vec::new(),
        }
    }
}

/// Effective config plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedConfig {
    pub config: ScanConfig,
    pub path: String,
    pub exists: bool,
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_extension() -> String {
    "cs".to_string()
}

fn default_skip_dirs() -> Vec<String> {
    [".git", ".svn", ".hg", ".vs", ".idea", "bin", "obj", "node_modules"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// Loading
// =============================================================================

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Load `csrefactor.json` from `root`, or built-in defaults when absent.
///
/// A present but malformed file is an error rather than a silent fallback.
pub fn load(root: &Path) -> Result<LoadedConfig> {
    let path = config_path(root);

    if !path.is_file() {
        return Ok(LoadedConfig {
            config: ScanConfig::default(),
            path: path.display().to_string(),
            exists: false,
        });
    }

    let content = io::read_file(&path, &format!("read {}", path.display()))?;
    let config: ScanConfig = serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))?;

    Ok(LoadedConfig {
        config: config.normalized()?,
        path: path.display().to_string(),
        exists: true,
    })
}

impl ScanConfig {
    /// Apply CLI overrides on top of file/default values.
    pub fn with_overrides(mut self, extension: Option<&str>, exclude: &[String]) -> Result<Self> {
        if let Some(ext) = extension {
            self.extension = ext.to_string();
        }
        self.exclude.extend(exclude.iter().cloned());
        self.normalized()
    }

    fn normalized(mut self) -> Result<Self> {
        let ext = self.extension.trim().trim_start_matches('.').to_string();
        if ext.is_empty() || ext.contains(|c: char| c == '/' || c == '\\') {
            return Err(Error::config_invalid_value(
                "extension",
                Some(self.extension.clone()),
                "Extension must be a non-empty file suffix such as 'cs'",
            ));
        }
        self.extension = ext;
        Ok(self)
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == self.extension)
    }

    pub fn is_skipped_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|d| d == name)
    }

    /// `relative` uses forward slashes regardless of platform.
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| glob_match::glob_match(pattern, relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_returns_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let loaded = load(dir.path()).unwrap();

        assert!(!loaded.exists);
        assert_eq!(loaded.config, ScanConfig::default());
        assert_eq!(loaded.config.extension, "cs");
    }

    #[test]
    fn load_merges_partial_file_with_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "exclude": ["**/Generated/**"] }"#,
        )
        .unwrap();

        let loaded = load(dir.path()).unwrap();
        assert!(loaded.exists);
        assert_eq!(loaded.config.extension, "cs");
        assert_eq!(loaded.config.exclude, vec!["**/Generated/**".to_string()]);
        assert!(loaded.config.is_skipped_dir("obj"));
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ extension: cs").unwrap();

        let err = load(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn overrides_strip_leading_dot() {
        let config = ScanConfig::default()
            .with_overrides(Some(".razor"), &[])
            .unwrap();
        assert_eq!(config.extension, "razor");
        assert!(config.matches_extension(Path::new("Pages/Index.razor")));
        assert!(!config.matches_extension(Path::new("Pages/Index.cs")));
    }

    #[test]
    fn overrides_reject_empty_extension() {
        let err = ScanConfig::default()
            .with_overrides(Some("."), &[])
            .unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_value");
    }

    #[test]
    fn exclude_patterns_match_relative_paths() {
        let config = ScanConfig::default()
            .with_overrides(None, &["LlmTornado.Demo/**".to_string()])
            .unwrap();

        assert!(config.is_excluded("LlmTornado.Demo/FilesDemo.cs"));
        assert!(!config.is_excluded("LlmTornado/TornadoApi.cs"));
    }
}
