//! Transport-neutral commands over the version service

use assetver_core::errors::Result;
use assetver_core::{
    AssetId, AssetVersion, AssetVersionType, AssetVersionUpdate, NewAssetVersion, VersionId,
    VersionService,
};
use assetver_core_types::RequestContext;
use serde::Serialize;

/// One request against the versioning core
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// All versions of an asset, ascending
    List {
        asset_type: AssetVersionType,
        asset_id: AssetId,
    },
    Create {
        asset_type: AssetVersionType,
        draft: NewAssetVersion,
    },
    Get {
        asset_type: AssetVersionType,
        id: VersionId,
    },
    /// Highest-numbered version of an asset
    Latest {
        asset_type: AssetVersionType,
        asset_id: AssetId,
    },
    /// Replace comment and archived flag
    Update {
        asset_type: AssetVersionType,
        update: AssetVersionUpdate,
    },
    /// Soft delete
    Archive {
        asset_type: AssetVersionType,
        id: VersionId,
    },
}

impl EngineCommand {
    pub fn asset_type(&self) -> AssetVersionType {
        match self {
            EngineCommand::List { asset_type, .. }
            | EngineCommand::Create { asset_type, .. }
            | EngineCommand::Get { asset_type, .. }
            | EngineCommand::Latest { asset_type, .. }
            | EngineCommand::Update { asset_type, .. }
            | EngineCommand::Archive { asset_type, .. } => *asset_type,
        }
    }
}

/// Result of applying an engine command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EngineCommandResult {
    Versions(Vec<AssetVersion>),
    Version(AssetVersion),
    Archived {
        asset_type: AssetVersionType,
        id: VersionId,
        archived: bool,
    },
}

/// Apply `cmd` on behalf of the service's acting identity
///
/// Errors leaving this function carry the request id of `ctx`.
///
/// # Errors
///
/// Whatever the underlying service operation returns.
pub fn apply_engine_command(
    cmd: EngineCommand,
    service: &VersionService,
    ctx: &RequestContext,
) -> Result<EngineCommandResult> {
    tracing::debug!(
        request_id = %ctx.request_id,
        asset_type = %cmd.asset_type(),
        "applying engine command"
    );
    dispatch(cmd, service).map_err(|e| e.with_context(ctx))
}

fn dispatch(cmd: EngineCommand, service: &VersionService) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::List {
            asset_type,
            asset_id,
        } => service
            .list_versions(asset_type, asset_id)
            .map(EngineCommandResult::Versions),
        EngineCommand::Create { asset_type, draft } => service
            .create(asset_type, draft)
            .map(EngineCommandResult::Version),
        EngineCommand::Get { asset_type, id } => service
            .get_by_id(asset_type, id)
            .map(EngineCommandResult::Version),
        EngineCommand::Latest {
            asset_type,
            asset_id,
        } => service
            .get_latest(asset_type, asset_id)
            .map(EngineCommandResult::Version),
        EngineCommand::Update { asset_type, update } => service
            .update(asset_type, update)
            .map(EngineCommandResult::Version),
        EngineCommand::Archive { asset_type, id } => {
            service.archive(asset_type, id)?;
            Ok(EngineCommandResult::Archived {
                asset_type,
                id,
                archived: true,
            })
        }
    }
}
