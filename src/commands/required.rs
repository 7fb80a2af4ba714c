use clap::Args;
use serde::Serialize;

use csrefactor::refactor::{self, RequiredReport};

use super::{CmdResult, ScanArgs};

#[derive(Args)]
pub struct RequiredArgs {
    #[command(flatten)]
    scan: ScanArgs,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum RequiredOutput {
    #[serde(rename = "required.scan")]
    Scan(RequiredReport),
}

pub fn run(args: RequiredArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<RequiredOutput> {
    let (root, config) = args.scan.resolve()?;
    let report = refactor::scan_tree(&root, &config)?;

    let exit_code = if report.failed > 0 { 1 } else { 0 };

    Ok((RequiredOutput::Scan(report), exit_code))
}
