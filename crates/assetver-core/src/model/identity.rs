use std::fmt;

use serde::{Deserialize, Serialize};

/// Login of a user acting on the versioning core
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(login: &str) -> Self {
        Self::new(login)
    }
}

impl From<String> for Identity {
    fn from(login: String) -> Self {
        Identity::new(login)
    }
}
