//! Create command
//!
//! Usage: assetver create <ASSET_TYPE> <ASSET_ID> [--comment TEXT]
//!        [--payload JSON | --payload-file PATH] [--initial-version N]

use std::path::PathBuf;

use assetver_core::{AssetId, AssetVersionType, NewAssetVersion, VersionService, FIRST_VERSION};
use assetver_engine::EngineCommand;
use clap::Args;

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub asset_type: AssetVersionType,
    pub asset_id: i64,

    #[arg(long)]
    pub comment: Option<String>,

    /// Type-specific content as inline JSON
    #[arg(long, conflicts_with = "payload_file")]
    pub payload: Option<String>,

    /// Read the JSON payload from a file
    #[arg(long)]
    pub payload_file: Option<PathBuf>,

    /// Number used when the asset has no versions yet
    #[arg(
        long,
        default_value_t = FIRST_VERSION,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub initial_version: u32,
}

pub fn execute(
    args: CreateArgs,
    service: &VersionService,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut draft =
        NewAssetVersion::new(AssetId(args.asset_id)).with_initial_version(args.initial_version);
    if let Some(comment) = args.comment {
        draft = draft.with_comment(comment);
    }
    let payload = match (args.payload, args.payload_file) {
        (Some(text), _) => Some(text),
        (None, Some(path)) => Some(std::fs::read_to_string(path)?),
        (None, None) => None,
    };
    if let Some(text) = payload {
        draft = draft.with_payload(serde_json::from_str(&text)?);
    }

    super::apply_and_print(
        EngineCommand::Create {
            asset_type: args.asset_type,
            draft,
        },
        service,
    )
}
