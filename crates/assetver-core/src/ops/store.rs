use crate::errors::Result;
use crate::model::{AssetId, AssetVersion, AssetVersionType, NewAssetVersion, VersionId};

/// In-place edit applied to a loaded version inside a store transaction.
///
/// Returning an error aborts the transaction without writing anything.
pub type Mutation<'a> = &'a mut dyn FnMut(&mut AssetVersion) -> Result<()>;

/// Persistence boundary for the versions of one asset type
///
/// Implementations must enforce uniqueness of `(asset_id, version)` and
/// report a violation as `ExErrorKind::Concurrency`, distinct from every
/// other failure, which is `Persistence`. Every write runs in its own
/// transaction that has committed or rolled back by the time the call
/// returns.
pub trait VersionStore: Send + Sync {
    /// Asset type whose versions this store holds
    fn asset_type(&self) -> AssetVersionType;

    /// All versions of an asset, ordered by version ascending
    ///
    /// # Errors
    ///
    /// `Persistence` if the store cannot be read.
    fn find_all_versions(&self, asset_id: AssetId) -> Result<Vec<AssetVersion>>;

    /// Highest version number of an asset, `None` when it has no versions
    ///
    /// # Errors
    ///
    /// `Persistence` if the store cannot be read.
    fn find_latest_version_number(&self, asset_id: AssetId) -> Result<Option<u32>>;

    /// # Errors
    ///
    /// `Persistence` if the store cannot be read.
    fn find_one(&self, id: VersionId) -> Result<Option<AssetVersion>>;

    /// Insert a stamped draft and return the generated id
    ///
    /// # Errors
    ///
    /// `Concurrency` if `(asset_id, version)` is taken, `InvalidInput` if the
    /// draft is unstamped, `Persistence` for anything else.
    fn save_new_and_flush(&self, draft: &NewAssetVersion) -> Result<VersionId>;

    /// Load, mutate and save one row in a single transaction
    ///
    /// Returns the row as persisted after the mutation, or `None` when `id`
    /// does not exist (the mutation is not called).
    ///
    /// # Errors
    ///
    /// Whatever the mutation returns, or `Persistence`.
    fn modify(&self, id: VersionId, mutation: Mutation<'_>) -> Result<Option<AssetVersion>>;
}
