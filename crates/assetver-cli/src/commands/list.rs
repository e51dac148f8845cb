//! Usage: assetver list <ASSET_TYPE> <ASSET_ID>

use assetver_core::{AssetId, AssetVersionType, VersionService};
use assetver_engine::EngineCommand;
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// COHORT, CONCEPT_SET, CHARACTERIZATION, INCIDENCE_RATE or PATHWAY
    pub asset_type: AssetVersionType,
    pub asset_id: i64,
}

pub fn execute(args: ListArgs, service: &VersionService) -> Result<(), Box<dyn std::error::Error>> {
    super::apply_and_print(
        EngineCommand::List {
            asset_type: args.asset_type,
            asset_id: AssetId(args.asset_id),
        },
        service,
    )
}
