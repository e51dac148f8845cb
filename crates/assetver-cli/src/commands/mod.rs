//! CLI subcommands. Each builds an `EngineCommand`, applies it and prints
//! the result as JSON on stdout.

pub mod archive;
pub mod create;
pub mod get;
pub mod list;
pub mod update;

use assetver_core::VersionService;
use assetver_core_types::RequestContext;
use assetver_engine::{apply_engine_command, EngineCommand};

fn apply_and_print(
    cmd: EngineCommand,
    service: &VersionService,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = apply_engine_command(cmd, service, &RequestContext::new())?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
