use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::errors::{ExError, ExErrorKind, Result, VersioningError};
use crate::model::{AssetId, AssetVersion, AssetVersionType, NewAssetVersion, VersionId};
use crate::ops::store::{Mutation, VersionStore};

/// In-memory version store
///
/// Holds the same uniqueness contract as the SQLite store, so allocator and
/// lifecycle behaviour can be exercised without a database. A mutex guards
/// each call; the allocator's read-then-insert still races across calls.
#[derive(Debug)]
pub struct MemoryVersionStore {
    asset_type: AssetVersionType,
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    rows: BTreeMap<VersionId, AssetVersion>,
}

impl MemoryVersionStore {
    pub fn new(asset_type: AssetVersionType) -> Self {
        Self {
            asset_type,
            state: Mutex::new(MemoryState {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored rows across all assets
    pub fn len(&self) -> usize {
        self.lock().map(|s| s.rows.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_asset_type(self.asset_type)
                .with_message("memory store lock poisoned")
        })
    }
}

impl VersionStore for MemoryVersionStore {
    fn asset_type(&self) -> AssetVersionType {
        self.asset_type
    }

    fn find_all_versions(&self, asset_id: AssetId) -> Result<Vec<AssetVersion>> {
        let state = self.lock()?;
        let mut versions: Vec<AssetVersion> = state
            .rows
            .values()
            .filter(|v| v.asset_id == asset_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    fn find_latest_version_number(&self, asset_id: AssetId) -> Result<Option<u32>> {
        let state = self.lock()?;
        Ok(state
            .rows
            .values()
            .filter(|v| v.asset_id == asset_id)
            .map(|v| v.version)
            .max())
    }

    fn find_one(&self, id: VersionId) -> Result<Option<AssetVersion>> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    fn save_new_and_flush(&self, draft: &NewAssetVersion) -> Result<VersionId> {
        let (created_by, created_date) = draft.require_stamp()?;
        let mut state = self.lock()?;

        let taken = state
            .rows
            .values()
            .any(|v| v.asset_id == draft.asset_id && v.version == draft.version);
        if taken {
            return Err(VersioningError::VersionConflict {
                asset_type: self.asset_type,
                asset_id: draft.asset_id,
                version: draft.version,
            }
            .into());
        }

        let id = VersionId(state.next_id);
        state.next_id += 1;
        state.rows.insert(
            id,
            AssetVersion {
                id,
                asset_type: self.asset_type,
                asset_id: draft.asset_id,
                version: draft.version,
                comment: draft.comment.clone(),
                archived: draft.archived,
                created_by: created_by.clone(),
                created_date,
                payload: draft.payload.clone(),
            },
        );
        Ok(id)
    }

    fn modify(&self, id: VersionId, mutation: Mutation<'_>) -> Result<Option<AssetVersion>> {
        let mut state = self.lock()?;
        let Some(current) = state.rows.get(&id) else {
            return Ok(None);
        };

        // Work on a copy so a failed mutation leaves the row untouched
        let mut edited = current.clone();
        mutation(&mut edited)?;

        let row = state
            .rows
            .get_mut(&id)
            .ok_or_else(|| ExError::new(ExErrorKind::Internal).with_version_id(id))?;
        row.comment = edited.comment;
        row.archived = edited.archived;
        Ok(Some(row.clone()))
    }
}
