use assetver_core::{AssetVersionType, VersionId, VersionService};
use assetver_engine::EngineCommand;
use clap::Args;

#[derive(Debug, Args)]
pub struct ArchiveArgs {
    pub asset_type: AssetVersionType,
    pub id: i64,
}

pub fn execute(
    args: ArchiveArgs,
    service: &VersionService,
) -> Result<(), Box<dyn std::error::Error>> {
    super::apply_and_print(
        EngineCommand::Archive {
            asset_type: args.asset_type,
            id: VersionId(args.id),
        },
        service,
    )
}
