//! Version number allocation under concurrent writers
//!
//! Numbers come from the store on every attempt (`latest + 1`), never from
//! an in-process counter, so several processes can share one store. A lost
//! race shows up as a uniqueness conflict on insert; the attempt's
//! transaction has already rolled back, and the next attempt re-reads.
//! There is no delay between attempts.

use std::num::NonZeroU32;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::{ExError, ExErrorKind, Result, VersioningError};
use crate::identity::IdentityProvider;
use crate::model::{AssetVersion, NewAssetVersion, VersionId};
use crate::ops::store::VersionStore;
use crate::schema::{EVENT_CONFLICT, EVENT_EXHAUSTED};

const OP_ALLOCATE: &str = "allocate_and_save";

/// Time source for creation stamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Assigns version numbers with bounded optimistic retry
#[derive(Clone)]
pub struct VersionAllocator {
    max_attempts: NonZeroU32,
    clock: Arc<dyn Clock>,
}

impl VersionAllocator {
    pub fn new(max_attempts: NonZeroU32) -> Self {
        Self {
            max_attempts,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    /// Stamp `draft`, give it the next free version number and persist it.
    ///
    /// Authorship (`created_by`, `created_date`) is stamped once, before the
    /// first attempt. Returns the row as re-read from the store.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the draft's initial version is 0
    /// - `VersioningExhausted` after `max_attempts` conflicting attempts
    /// - any non-conflict store error, unretried
    pub fn allocate_and_save(
        &self,
        store: &dyn VersionStore,
        identity: &dyn IdentityProvider,
        mut draft: NewAssetVersion,
    ) -> Result<AssetVersion> {
        let asset_type = store.asset_type();
        let asset_id = draft.asset_id;
        if draft.version == 0 {
            return Err(ExError::from(VersioningError::NonPositiveVersion {
                asset_id,
                version: draft.version,
            })
            .with_op(OP_ALLOCATE)
            .with_asset_type(asset_type));
        }
        draft.stamp(identity.current_identity(), self.clock.now());

        for attempt in 1..=self.max_attempts.get() {
            if let Some(latest) = store.find_latest_version_number(asset_id)? {
                draft.version = latest.checked_add(1).ok_or_else(|| {
                    ExError::new(ExErrorKind::Internal)
                        .with_op(OP_ALLOCATE)
                        .with_asset_type(asset_type)
                        .with_asset_id(asset_id)
                        .with_message("version number overflow")
                })?;
            }

            tracing::debug!(
                op = OP_ALLOCATE,
                asset_type = %asset_type,
                asset_id = asset_id.0,
                attempt,
                candidate_version = draft.version,
                "attempting version insert"
            );

            match store.save_new_and_flush(&draft) {
                Ok(id) => return read_back(store, id),
                Err(err) if err.is_conflict() => {
                    tracing::warn!(
                        op = OP_ALLOCATE,
                        event = EVENT_CONFLICT,
                        asset_type = %asset_type,
                        asset_id = asset_id.0,
                        attempt,
                        max_attempts = self.max_attempts.get(),
                        version = draft.version,
                        "Error during saving version, retrying"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        tracing::error!(
            op = OP_ALLOCATE,
            event = EVENT_EXHAUSTED,
            asset_type = %asset_type,
            asset_id = asset_id.0,
            max_attempts = self.max_attempts.get(),
            "Error during saving version"
        );
        Err(ExError::from(VersioningError::AttemptsExhausted {
            asset_type,
            asset_id,
            attempts: self.max_attempts.get(),
        })
        .with_op(OP_ALLOCATE))
    }
}

impl std::fmt::Debug for VersionAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionAllocator")
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Callers get the row as stored, with any normalization the store applied.
fn read_back(store: &dyn VersionStore, id: VersionId) -> Result<AssetVersion> {
    store.find_one(id)?.ok_or_else(|| {
        ExError::new(ExErrorKind::Internal)
            .with_op(OP_ALLOCATE)
            .with_asset_type(store.asset_type())
            .with_version_id(id)
            .with_message("saved version is not readable")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentityProvider;
    use crate::model::{AssetId, AssetVersionType};
    use crate::ops::memory_store::MemoryVersionStore;

    fn allocator(max: u32) -> VersionAllocator {
        VersionAllocator::new(NonZeroU32::new(max).unwrap())
    }

    #[test]
    fn test_first_version_keeps_caller_default() {
        let store = MemoryVersionStore::new(AssetVersionType::Cohort);
        let identity = StaticIdentityProvider::new("alice");

        let saved = allocator(3)
            .allocate_and_save(&store, &identity, NewAssetVersion::new(AssetId(5)))
            .unwrap();
        assert_eq!(saved.version, 1);

        let custom = allocator(3)
            .allocate_and_save(
                &store,
                &identity,
                NewAssetVersion::new(AssetId(6)).with_initial_version(4),
            )
            .unwrap();
        assert_eq!(custom.version, 4);
    }

    #[test]
    fn test_zero_initial_version_is_rejected() {
        let store = MemoryVersionStore::new(AssetVersionType::Cohort);
        let err = allocator(3)
            .allocate_and_save(
                &store,
                &StaticIdentityProvider::new("alice"),
                NewAssetVersion::new(AssetId(1)).with_initial_version(0),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert!(store.is_empty());
    }

    #[test]
    fn test_next_version_follows_latest() {
        let store = MemoryVersionStore::new(AssetVersionType::ConceptSet);
        let identity = StaticIdentityProvider::new("alice");
        let alloc = allocator(3);

        for expected in 1..=3 {
            let saved = alloc
                .allocate_and_save(&store, &identity, NewAssetVersion::new(AssetId(1)))
                .unwrap();
            assert_eq!(saved.version, expected);
        }
    }

    #[test]
    fn test_stamp_uses_identity_and_clock() {
        let store = MemoryVersionStore::new(AssetVersionType::Cohort);
        let instant = Utc::now();
        let saved = allocator(1)
            .with_clock(Arc::new(FixedClock(instant)))
            .allocate_and_save(
                &store,
                &StaticIdentityProvider::new("bob"),
                NewAssetVersion::new(AssetId(1)),
            )
            .unwrap();
        assert_eq!(saved.created_by.as_str(), "bob");
        assert_eq!(saved.created_date, instant);
    }
}
