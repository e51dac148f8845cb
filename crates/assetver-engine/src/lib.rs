//! Asset versioning engine
//!
//! Wires configuration, SQLite stores, the type router and an identity
//! provider into a `VersionService`, and dispatches transport-neutral
//! commands against it.

pub mod bootstrap;
pub mod commands;

pub use bootstrap::{open_in_memory_service, open_service};
pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
