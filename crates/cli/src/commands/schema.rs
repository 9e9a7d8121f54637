use std::process::ExitCode;

use anyhow::Result;
use chore_core::configs::workspace::WorkspaceConfig;

pub fn execute() -> Result<ExitCode> {
    let schema = chore_core::configs::json_schema::<WorkspaceConfig>();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(ExitCode::SUCCESS)
}
