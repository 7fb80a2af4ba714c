use clap::{Args, Subcommand};
use serde::Serialize;

use csrefactor::config::{self, ScanConfig};
use csrefactor::utils::paths;

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (merged defaults + csrefactor.json)
    Show {
        /// Root directory holding csrefactor.json (defaults to the current directory)
        path: Option<String>,
        /// Show only built-in defaults (ignore csrefactor.json)
        #[arg(long)]
        builtin: bool,
    },
    /// Show the path to csrefactor.json for a root
    Path {
        /// Root directory (defaults to the current directory)
        path: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<ScanConfig>,
    path: String,
    exists: bool,
}

pub fn run(args: ConfigArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { path, builtin } => show(path.as_deref(), builtin),
        ConfigCommand::Path { path } => path_of(path.as_deref()),
    }
}

fn root_of(path: Option<&str>) -> std::path::PathBuf {
    path.map(paths::expand)
        .unwrap_or_else(|| std::path::PathBuf::from("."))
}

fn show(path: Option<&str>, builtin: bool) -> CmdResult<ConfigOutput> {
    let root = root_of(path);

    if builtin {
        let file = config::config_path(&root);
        return Ok((
            ConfigOutput {
                command: "config.show".to_string(),
                config: Some(ScanConfig::default()),
                exists: file.is_file(),
                path: file.display().to_string(),
            },
            0,
        ));
    }

    paths::require_dir(&root, "path")?;
    let loaded = config::load(&root)?;

    Ok((
        ConfigOutput {
            command: "config.show".to_string(),
            config: Some(loaded.config),
            path: loaded.path,
            exists: loaded.exists,
        },
        0,
    ))
}

fn path_of(path: Option<&str>) -> CmdResult<ConfigOutput> {
    let file = config::config_path(&root_of(path));

    Ok((
        ConfigOutput {
            command: "config.path".to_string(),
            config: None,
            exists: file.is_file(),
            path: file.display().to_string(),
        },
        0,
    ))
}
