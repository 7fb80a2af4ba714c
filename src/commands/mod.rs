use clap::Args;
use std::path::PathBuf;

use csrefactor::config::ScanConfig;
use csrefactor::utils::paths;

pub type CmdResult<T> = csrefactor::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

/// Target tree and file-selection flags shared by the tree-walking commands.
#[derive(Args, Default, Debug)]
pub struct ScanArgs {
    /// Root directory to scan (defaults to the current directory)
    pub path: Option<String>,

    /// File extension to process, overriding csrefactor.json (default: cs)
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Glob of root-relative paths to skip (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,
}

impl ScanArgs {
    /// Root path with `~` expanded; `.` when no path was given.
    pub fn root(&self) -> PathBuf {
        self.path
            .as_deref()
            .map(paths::expand)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve the root and the effective config (file, then flags).
    pub fn resolve(&self) -> csrefactor::Result<(PathBuf, ScanConfig)> {
        let root = self.root();
        paths::require_dir(&root, "path")?;

        let loaded = csrefactor::config::load(&root)?;
        let config = loaded
            .config
            .with_overrides(self.extension.as_deref(), &self.exclude)?;

        Ok((root, config))
    }
}

pub mod config;
pub mod namespace;
pub mod required;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (csrefactor::Result<serde_json::Value>, i32) {
    crate::tty::status("csrefactor is working...");

    match command {
        crate::Commands::Namespace(args) => dispatch!(args, global, namespace),
        crate::Commands::Required(args) => dispatch!(args, global, required),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
