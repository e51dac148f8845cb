//! Asset version persistence on SQLite
//!
//! Provides:
//! - Connection setup (WAL, busy timeout)
//! - Embedded migrations with checksums and idempotent application
//! - `SqliteVersionStore`, one per asset type, each over its own table

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use repo::SqliteVersionStore;
