pub mod asset_type;
pub mod identity;
pub mod version;

pub use asset_type::AssetVersionType;
pub use identity::Identity;
pub use version::{
    AssetId, AssetVersion, AssetVersionUpdate, NewAssetVersion, VersionId, FIRST_VERSION,
};
