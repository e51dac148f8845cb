//! Migration framework
//!
//! Provides:
//! - Migration runner with checksum verification
//! - Idempotent application
//! - Embedded SQL migrations

mod checksums;
mod embedded;
mod runner;

pub use embedded::{get_migrations, Migration};
pub use runner::{applied_migrations, apply_migrations};
