use assetver_core::{AssetId, AssetVersionType, VersionId, VersionService};
use assetver_engine::EngineCommand;
use clap::Args;

#[derive(Debug, Args)]
pub struct GetArgs {
    pub asset_type: AssetVersionType,
    /// Version record id
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct LatestArgs {
    pub asset_type: AssetVersionType,
    pub asset_id: i64,
}

pub fn execute(args: GetArgs, service: &VersionService) -> Result<(), Box<dyn std::error::Error>> {
    super::apply_and_print(
        EngineCommand::Get {
            asset_type: args.asset_type,
            id: VersionId(args.id),
        },
        service,
    )
}

pub fn execute_latest(
    args: LatestArgs,
    service: &VersionService,
) -> Result<(), Box<dyn std::error::Error>> {
    super::apply_and_print(
        EngineCommand::Latest {
            asset_type: args.asset_type,
            asset_id: AssetId(args.asset_id),
        },
        service,
    )
}
