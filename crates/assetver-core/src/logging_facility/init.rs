//! Logging initialization module

use std::str::FromStr;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

use crate::errors::{ExError, ExErrorKind};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output for development
    #[default]
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl FromStr for Profile {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            "test" => Ok(Profile::Test),
            other => Err(ExError::new(ExErrorKind::InvalidConfig)
                .with_op("parse_log_profile")
                .with_message(format!("Unknown logging profile '{}'", other))),
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at startup; later calls are ignored. `RUST_LOG` overrides the
/// profile's default filter.
///
/// - **Development**: human-readable, `assetver=debug`
/// - **Production**: JSON, `assetver=info`
/// - **Test**: bare registry; use `init_test_capture()` to record events
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("assetver=debug")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("assetver=info")),
                )
                .with_writer(std::io::stderr)
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parsing() {
        assert_eq!("prod".parse::<Profile>().unwrap(), Profile::Production);
        assert_eq!("Development".parse::<Profile>().unwrap(), Profile::Development);
        assert_eq!(
            "verbose".parse::<Profile>().unwrap_err().kind(),
            ExErrorKind::InvalidConfig
        );
    }

    #[test]
    fn test_default_profile_is_development() {
        assert_eq!(Profile::default(), Profile::Development);
    }
}
