//! Version stores backed by SQLite

pub mod sqlite_version_store;

pub use sqlite_version_store::{table_name, SqliteVersionStore};
