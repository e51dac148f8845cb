//! Identity provider interface
//!
//! The core never authenticates anyone. It asks the provider who is acting
//! and whether that identity holds administrative privilege.

use std::collections::BTreeSet;

use crate::model::Identity;

/// Source of the acting identity for a request.
pub trait IdentityProvider: Send + Sync {
    /// Identity performing the current operation
    fn current_identity(&self) -> Identity;

    /// Whether `identity` may mutate versions it did not create
    fn has_admin_privilege(&self, identity: &Identity) -> bool;
}

/// Fixed acting identity plus a static admin roster.
///
/// Used by the CLI (one identity per process) and in tests.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identity: Identity,
    admins: BTreeSet<Identity>,
}

impl StaticIdentityProvider {
    pub fn new(identity: impl Into<Identity>) -> Self {
        Self {
            identity: identity.into(),
            admins: BTreeSet::new(),
        }
    }

    /// Provider whose acting identity is itself an admin
    pub fn admin(identity: impl Into<Identity>) -> Self {
        let identity = identity.into();
        let mut admins = BTreeSet::new();
        admins.insert(identity.clone());
        Self { identity, admins }
    }

    pub fn with_admin(mut self, admin: impl Into<Identity>) -> Self {
        self.admins.insert(admin.into());
        self
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn current_identity(&self) -> Identity {
        self.identity.clone()
    }

    fn has_admin_privilege(&self, identity: &Identity) -> bool {
        self.admins.contains(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identity_is_not_admin() {
        let provider = StaticIdentityProvider::new("alice");
        assert_eq!(provider.current_identity().as_str(), "alice");
        assert!(!provider.has_admin_privilege(&Identity::new("alice")));
    }

    #[test]
    fn test_admin_roster() {
        let provider = StaticIdentityProvider::new("alice").with_admin("root");
        assert!(provider.has_admin_privilege(&Identity::new("root")));
        assert!(!provider.has_admin_privilege(&Identity::new("alice")));
        assert!(StaticIdentityProvider::admin("root")
            .has_admin_privilege(&Identity::new("root")));
    }
}
