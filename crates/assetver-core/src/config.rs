//! Versioning configuration
//!
//! Loaded once at startup with two layers (highest wins):
//! 1. Environment variables: `ASSETVER_MAX_ATTEMPTS`, `ASSETVER_DB_PATH`,
//!    `ASSETVER_LOG_PROFILE`
//! 2. A TOML file, when one is given
//!
//! ```toml
//! [versioning]
//! max_attempts = 10
//!
//! [store]
//! path = ".assetver/versions.db"
//!
//! [logging]
//! profile = "development"
//! ```

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ExError, ExErrorKind, Result, VersioningError};
use crate::logging_facility::Profile;

pub const ENV_MAX_ATTEMPTS: &str = "ASSETVER_MAX_ATTEMPTS";
pub const ENV_DB_PATH: &str = "ASSETVER_DB_PATH";
pub const ENV_LOG_PROFILE: &str = "ASSETVER_LOG_PROFILE";

/// Allocation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Signed so that a negative value in the file reaches `validate` and is
    /// reported as a configuration error instead of a parse error.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: i64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_max_attempts() -> i64 {
    10
}

/// SQLite store location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from(".assetver/versions.db")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub profile: Profile,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersioningConfig {
    #[serde(default)]
    pub versioning: AllocationConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VersioningConfig {
    /// Defaults overlaid with a config file (if any) and the process environment.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `InvalidConfig` if it does not parse
    /// or any value is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load a specific file and apply environment overrides
    ///
    /// # Errors
    ///
    /// Same as [`VersioningConfig::load`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::load(Some(path))
    }

    /// Parse TOML text without consulting the environment
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the text does not parse or fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("parse_config")
                .with_message(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("read_config")
                .with_message(format!("{}: {}", path.display(), e))
        })?;
        toml::from_str(&text).map_err(|e| {
            ExError::new(ExErrorKind::InvalidConfig)
                .with_op("parse_config")
                .with_message(format!("{}: {}", path.display(), e))
        })
    }

    /// Overlay values from an environment lookup
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when a variable is set but cannot be parsed.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            self.versioning.max_attempts = raw.trim().parse::<i64>().map_err(|_| {
                ExError::from(VersioningError::InvalidMaxAttempts { value: raw.clone() })
                    .with_op("apply_env_overrides")
            })?;
        }
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.store.path = PathBuf::from(path);
        }
        if let Some(profile) = lookup(ENV_LOG_PROFILE) {
            self.logging.profile = profile.parse()?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// `InvalidConfig` if `max_attempts` is zero, negative or above `u32::MAX`.
    pub fn validate(&self) -> Result<()> {
        self.max_attempts().map(|_| ())
    }

    /// Validated retry budget for the allocator
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configured value is not a positive `u32`.
    pub fn max_attempts(&self) -> Result<NonZeroU32> {
        let raw = self.versioning.max_attempts;
        u32::try_from(raw)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                ExError::from(VersioningError::InvalidMaxAttempts {
                    value: raw.to_string(),
                })
                .with_op("validate_config")
            })
    }

    pub fn with_max_attempts(mut self, max_attempts: i64) -> Self {
        self.versioning.max_attempts = max_attempts;
        self
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store.path = path.into();
        self
    }
}
