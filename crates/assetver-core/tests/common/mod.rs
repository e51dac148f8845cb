use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use assetver_core::errors::{ExError, ExErrorKind, Result};
use assetver_core::ops::{Mutation, VersionStore};
use assetver_core::{
    AssetId, AssetVersion, AssetVersionType, MemoryVersionStore, NewAssetVersion,
    StaticIdentityProvider, TypeRouter, VersionAllocator, VersionId, VersionService,
};

/// What the scripted store does when an insert is attempted
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum InsertScript {
    /// Report a conflict for the first `n` inserts, then delegate
    ConflictTimes(u32),
    /// Like `ConflictTimes`, but a competing writer really takes the
    /// candidate version before each reported conflict
    RaceTimes(u32),
    /// Every insert conflicts
    AlwaysConflict,
    /// Every insert fails with a non-conflict persistence error
    AlwaysBroken,
}

/// Memory store wrapped with a scripted insert path, counting attempts
#[allow(dead_code)]
pub struct ScriptedStore {
    inner: MemoryVersionStore,
    script: InsertScript,
    inserts: AtomicU32,
}

#[allow(dead_code)]
impl ScriptedStore {
    pub fn new(asset_type: AssetVersionType, script: InsertScript) -> Self {
        Self {
            inner: MemoryVersionStore::new(asset_type),
            script,
            inserts: AtomicU32::new(0),
        }
    }

    /// Number of `save_new_and_flush` calls seen so far
    pub fn insert_attempts(&self) -> u32 {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryVersionStore {
        &self.inner
    }

    fn conflict(&self, draft: &NewAssetVersion) -> ExError {
        ExError::new(ExErrorKind::Concurrency)
            .with_asset_type(self.inner.asset_type())
            .with_asset_id(draft.asset_id)
            .with_message(format!("version {} already taken", draft.version))
    }
}

impl VersionStore for ScriptedStore {
    fn asset_type(&self) -> AssetVersionType {
        self.inner.asset_type()
    }

    fn find_all_versions(&self, asset_id: AssetId) -> Result<Vec<AssetVersion>> {
        self.inner.find_all_versions(asset_id)
    }

    fn find_latest_version_number(&self, asset_id: AssetId) -> Result<Option<u32>> {
        self.inner.find_latest_version_number(asset_id)
    }

    fn find_one(&self, id: VersionId) -> Result<Option<AssetVersion>> {
        self.inner.find_one(id)
    }

    fn save_new_and_flush(&self, draft: &NewAssetVersion) -> Result<VersionId> {
        let attempt = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
        match self.script {
            InsertScript::ConflictTimes(n) if attempt <= n => Err(self.conflict(draft)),
            InsertScript::RaceTimes(n) if attempt <= n => {
                let mut competitor = draft.clone();
                competitor.stamp(
                    assetver_core::Identity::new("competitor"),
                    chrono::Utc::now(),
                );
                self.inner.save_new_and_flush(&competitor)?;
                Err(self.conflict(draft))
            }
            InsertScript::AlwaysConflict => Err(self.conflict(draft)),
            InsertScript::AlwaysBroken => Err(ExError::new(ExErrorKind::Persistence)
                .with_op("sqlite")
                .with_message("disk I/O error")),
            _ => self.inner.save_new_and_flush(draft),
        }
    }

    fn modify(&self, id: VersionId, mutation: Mutation<'_>) -> Result<Option<AssetVersion>> {
        self.inner.modify(id, mutation)
    }
}

#[allow(dead_code)]
pub fn allocator(max_attempts: u32) -> VersionAllocator {
    VersionAllocator::new(NonZeroU32::new(max_attempts).expect("max_attempts > 0"))
}

/// Router with memory stores for every type, `cohort` serving COHORT
#[allow(dead_code)]
pub fn router_with_cohort_store(cohort: Arc<dyn VersionStore>) -> Arc<TypeRouter> {
    let mut builder = TypeRouter::builder().register(AssetVersionType::Cohort, cohort);
    for t in AssetVersionType::ALL {
        if t != AssetVersionType::Cohort {
            builder = builder.register(t, Arc::new(MemoryVersionStore::new(t)));
        }
    }
    Arc::new(builder.build().expect("all types registered"))
}

/// Service over in-memory stores acting as `user`
#[allow(dead_code)]
pub fn memory_service(user: &str, max_attempts: u32) -> VersionService {
    let router = TypeRouter::uniform(|t| Arc::new(MemoryVersionStore::new(t)));
    VersionService::new(
        Arc::new(router),
        allocator(max_attempts),
        Arc::new(StaticIdentityProvider::new(user)),
    )
}

#[allow(dead_code)]
pub fn acting(service: &VersionService, user: &str) -> VersionService {
    service.acting_as(Arc::new(StaticIdentityProvider::new(user)))
}

#[allow(dead_code)]
pub fn acting_admin(service: &VersionService, user: &str) -> VersionService {
    service.acting_as(Arc::new(StaticIdentityProvider::admin(user)))
}

#[allow(dead_code)]
pub fn draft(asset_id: i64) -> NewAssetVersion {
    NewAssetVersion::new(AssetId(asset_id))
}
