//! Version lifecycle: list, create, fetch, update, archive
//!
//! Reads are unrestricted. Mutations of existing versions require the acting
//! identity to be the creator or an admin, checked inside the same store
//! transaction as the write.

use std::sync::Arc;
use std::time::Instant;

use crate::authz::check_owner_or_admin;
use crate::config::VersioningConfig;
use crate::errors::{ExError, ExErrorKind, Result, VersioningError};
use crate::identity::IdentityProvider;
use crate::model::{
    AssetId, AssetVersion, AssetVersionType, AssetVersionUpdate, NewAssetVersion, VersionId,
};
use crate::ops::allocator::VersionAllocator;
use crate::ops::router::TypeRouter;
use crate::{log_op_end, log_op_error, log_op_start};

/// Entry point of the versioning core
///
/// Cheap to clone; clones share the router. Use [`VersionService::acting_as`]
/// to serve a request on behalf of a different identity.
#[derive(Clone)]
pub struct VersionService {
    router: Arc<TypeRouter>,
    allocator: VersionAllocator,
    identity: Arc<dyn IdentityProvider>,
}

impl VersionService {
    pub fn new(
        router: Arc<TypeRouter>,
        allocator: VersionAllocator,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            router,
            allocator,
            identity,
        }
    }

    /// Build a service whose retry budget comes from `config`
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `max_attempts` is not a positive integer.
    pub fn from_config(
        router: Arc<TypeRouter>,
        config: &VersioningConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self> {
        let allocator = VersionAllocator::new(config.max_attempts()?);
        Ok(Self::new(router, allocator, identity))
    }

    /// Same stores and allocator, different acting identity
    pub fn acting_as(&self, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            router: Arc::clone(&self.router),
            allocator: self.allocator.clone(),
            identity,
        }
    }

    pub fn router(&self) -> &TypeRouter {
        &self.router
    }

    /// All versions of an asset, version ascending
    ///
    /// # Errors
    ///
    /// `UnsupportedType` or a store error.
    pub fn list_versions(
        &self,
        asset_type: AssetVersionType,
        asset_id: AssetId,
    ) -> Result<Vec<AssetVersion>> {
        observe("list_versions", asset_type, || {
            self.router.resolve(asset_type)?.find_all_versions(asset_id)
        })
    }

    /// Persist a new version of an asset with the next free number
    ///
    /// # Errors
    ///
    /// `VersioningExhausted` under sustained contention, `UnsupportedType`,
    /// or a non-conflict store error.
    pub fn create(
        &self,
        asset_type: AssetVersionType,
        draft: NewAssetVersion,
    ) -> Result<AssetVersion> {
        observe("create_version", asset_type, || {
            let store = self.router.resolve(asset_type)?;
            self.allocator
                .allocate_and_save(store, self.identity.as_ref(), draft)
        })
    }

    /// # Errors
    ///
    /// `NotFound` if no such version exists.
    pub fn get_by_id(&self, asset_type: AssetVersionType, id: VersionId) -> Result<AssetVersion> {
        observe("get_version", asset_type, || {
            self.router
                .resolve(asset_type)?
                .find_one(id)?
                .ok_or_else(|| not_found(asset_type, id))
        })
    }

    /// Highest-numbered version of an asset
    ///
    /// # Errors
    ///
    /// `NotFound` if the asset has no versions.
    pub fn get_latest(
        &self,
        asset_type: AssetVersionType,
        asset_id: AssetId,
    ) -> Result<AssetVersion> {
        observe("get_latest_version", asset_type, || {
            self.router
                .resolve(asset_type)?
                .find_all_versions(asset_id)?
                .into_iter()
                .max_by_key(|v| v.version)
                .ok_or_else(|| {
                    ExError::new(ExErrorKind::NotFound)
                        .with_asset_type(asset_type)
                        .with_asset_id(asset_id)
                        .with_message("Asset has no versions")
                })
        })
    }

    /// Replace the comment and archived flag of a version
    ///
    /// Can restore an archived version by passing `archived: false`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Forbidden` (record untouched), or a store error.
    pub fn update(
        &self,
        asset_type: AssetVersionType,
        update: AssetVersionUpdate,
    ) -> Result<AssetVersion> {
        observe("update_version", asset_type, || {
            let AssetVersionUpdate {
                id,
                comment,
                archived,
            } = update;
            let identity = self.identity.as_ref();
            self.router
                .resolve(asset_type)?
                .modify(id, &mut |current| {
                    check_owner_or_admin(identity, &current.created_by)?;
                    current.comment = comment.clone();
                    current.archived = archived;
                    Ok(())
                })?
                .ok_or_else(|| not_found(asset_type, id))
        })
    }

    /// Soft-delete a version; the record stays readable
    ///
    /// # Errors
    ///
    /// `NotFound`, `Forbidden` (record untouched), or a store error.
    pub fn archive(&self, asset_type: AssetVersionType, id: VersionId) -> Result<()> {
        observe("archive_version", asset_type, || {
            let identity = self.identity.as_ref();
            self.router
                .resolve(asset_type)?
                .modify(id, &mut |current| {
                    check_owner_or_admin(identity, &current.created_by)?;
                    current.archived = true;
                    Ok(())
                })?
                .map(|_| ())
                .ok_or_else(|| not_found(asset_type, id))
        })
    }
}

impl std::fmt::Debug for VersionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionService")
            .field("router", &self.router)
            .field("allocator", &self.allocator)
            .field("identity", &self.identity.current_identity())
            .finish()
    }
}

fn not_found(asset_type: AssetVersionType, version_id: VersionId) -> ExError {
    VersioningError::VersionNotFound {
        asset_type,
        version_id,
    }
    .into()
}

/// Wrap an operation in start / end / end_error log events
fn observe<T>(
    op: &'static str,
    asset_type: AssetVersionType,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let started = Instant::now();
    log_op_start!(op, asset_type = %asset_type);
    let result = f();
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms, asset_type = %asset_type);
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms, asset_type = %asset_type);
        }
    }
    result.map_err(|e| match e.op() {
        Some(_) => e,
        None => e.with_op(op),
    })
}
