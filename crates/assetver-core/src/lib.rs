//! assetver Core - versioning of research assets
//!
//! Assigns strictly increasing version numbers to cohort definitions, concept
//! sets, characterizations, incidence-rate and pathway analyses under
//! concurrent writers:
//! - Version model and asset type enumeration
//! - Version store trait plus an in-memory implementation
//! - Type router, allocator (optimistic retry) and lifecycle service
//! - Owner-or-admin authorization on mutation, soft delete by archiving
//! - Error and logging facilities shared by the other assetver crates

pub mod authz;
pub mod config;
pub mod errors;
pub mod identity;
pub mod logging_facility;
pub mod model;
pub mod ops;

pub use assetver_core_types::schema;

// Re-export commonly used types
pub use config::VersioningConfig;
pub use errors::{ExError, ExErrorKind, Result, VersioningError};
pub use identity::{IdentityProvider, StaticIdentityProvider};
pub use model::{
    AssetId, AssetVersion, AssetVersionType, AssetVersionUpdate, Identity, NewAssetVersion,
    VersionId, FIRST_VERSION,
};
pub use ops::{MemoryVersionStore, TypeRouter, VersionAllocator, VersionService, VersionStore};
