use clap::Args;
use serde::Serialize;

use csrefactor::refactor::{self, NamespaceReport};
use csrefactor::utils::paths;

use super::{CmdResult, ScanArgs};

#[derive(Args)]
pub struct NamespaceArgs {
    #[command(flatten)]
    scan: ScanArgs,

    /// Convert a single file instead of walking a directory
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["path", "extension", "exclude"]
    )]
    file: Option<String>,

    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    write: bool,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum NamespaceOutput {
    #[serde(rename = "namespace.convert")]
    Convert(NamespaceReport),
}

pub fn run(args: NamespaceArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<NamespaceOutput> {
    let report = match args.file.as_deref() {
        Some(file) => refactor::convert_single(&paths::expand(file), args.write)?,
        None => {
            let (root, config) = args.scan.resolve()?;
            refactor::convert_tree(&root, &config, args.write)?
        }
    };

    let exit_code = if report.failed > 0 { 1 } else { 0 };

    Ok((NamespaceOutput::Convert(report), exit_code))
}
