//! Owner-or-admin authorization for version mutation

use crate::errors::{Result, VersioningError};
use crate::identity::IdentityProvider;
use crate::model::Identity;

/// Allow the acting identity if it created the version or is an admin.
///
/// # Errors
///
/// Returns `ExErrorKind::Forbidden` when neither holds.
pub fn check_owner_or_admin(identity: &dyn IdentityProvider, owner: &Identity) -> Result<()> {
    let actor = identity.current_identity();
    if &actor == owner || identity.has_admin_privilege(&actor) {
        return Ok(());
    }

    tracing::debug!(actor = %actor, owner = %owner, "owner-or-admin check denied");
    Err(VersioningError::NotOwnerOrAdmin {
        actor,
        owner: owner.clone(),
    }
    .into())
}
