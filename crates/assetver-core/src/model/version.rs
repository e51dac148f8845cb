use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset_type::AssetVersionType;
use super::identity::Identity;
use crate::errors::{Result, VersioningError};

/// Version number given to the first snapshot of an asset
pub const FIRST_VERSION: u32 = 1;

/// Identifier of a logical asset (shared by all of its versions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub i64);

/// Store-generated identifier of one version record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(pub i64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted snapshot of an asset
///
/// Everything except `comment` and `archived` is fixed at creation. Records
/// are never physically removed; archiving is the delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetVersion {
    pub id: VersionId,
    pub asset_type: AssetVersionType,
    pub asset_id: AssetId,
    pub version: u32,
    pub comment: Option<String>,
    pub archived: bool,
    pub created_by: Identity,
    pub created_date: DateTime<Utc>,
    /// Serialized asset content captured with this version
    pub payload: serde_json::Value,
}

impl AssetVersion {
    pub fn is_archived(&self) -> bool {
        self.archived
    }

    pub fn is_created_by(&self, identity: &Identity) -> bool {
        &self.created_by == identity
    }
}

/// A version that has not been persisted yet
///
/// `version` is only a default: the allocator overwrites it with
/// `latest + 1` whenever the asset already has versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssetVersion {
    pub asset_id: AssetId,
    pub version: u32,
    pub comment: Option<String>,
    pub archived: bool,
    pub payload: serde_json::Value,
    pub created_by: Option<Identity>,
    pub created_date: Option<DateTime<Utc>>,
}

impl NewAssetVersion {
    pub fn new(asset_id: AssetId) -> Self {
        Self {
            asset_id,
            version: FIRST_VERSION,
            comment: None,
            archived: false,
            payload: serde_json::Value::Null,
            created_by: None,
            created_date: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Override the version used when the asset has no versions yet
    pub fn with_initial_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set the authorship stamp
    pub fn stamp(&mut self, created_by: Identity, created_date: DateTime<Utc>) {
        self.created_by = Some(created_by);
        self.created_date = Some(created_date);
    }

    /// Authorship stamp, or `InvalidInput` if the draft was never stamped
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::InvalidInput` when either stamp field is missing.
    pub fn require_stamp(&self) -> Result<(&Identity, DateTime<Utc>)> {
        match (&self.created_by, self.created_date) {
            (Some(by), Some(date)) => Ok((by, date)),
            _ => Err(VersioningError::UnstampedDraft {
                asset_id: self.asset_id,
            }
            .into()),
        }
    }
}

/// The mutable fields of a version, as sent by an update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetVersionUpdate {
    pub id: VersionId,
    pub comment: Option<String>,
    pub archived: bool,
}
