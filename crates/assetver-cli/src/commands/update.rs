//! Update command
//!
//! Replaces both mutable fields: omitting `--comment` clears it, omitting
//! `--archived` restores an archived version.

use assetver_core::{AssetVersionType, AssetVersionUpdate, VersionId, VersionService};
use assetver_engine::EngineCommand;
use clap::Args;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub asset_type: AssetVersionType,
    pub id: i64,

    #[arg(long)]
    pub comment: Option<String>,

    #[arg(long)]
    pub archived: bool,
}

pub fn execute(
    args: UpdateArgs,
    service: &VersionService,
) -> Result<(), Box<dyn std::error::Error>> {
    super::apply_and_print(
        EngineCommand::Update {
            asset_type: args.asset_type,
            update: AssetVersionUpdate {
                id: VersionId(args.id),
                comment: args.comment,
                archived: args.archived,
            },
        },
        service,
    )
}
