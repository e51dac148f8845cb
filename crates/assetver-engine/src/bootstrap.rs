//! Service construction
//!
//! One connection is shared by the stores of all five asset types. The
//! router is built strict: a missing store fails startup, not a request.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use assetver_core::errors::Result;
use assetver_core::{
    log_op_end, log_op_error, log_op_start, AssetVersionType, IdentityProvider, TypeRouter,
    VersionService, VersioningConfig,
};
use assetver_store::{db, migrations, SqliteVersionStore};
use rusqlite::Connection;

/// Open the database at `config.store.path`, migrate it and build a service
///
/// # Errors
///
/// `InvalidConfig` for a bad retry budget, `Io` if the database directory
/// cannot be created, `Persistence` if opening or migrating fails.
pub fn open_service(
    config: &VersioningConfig,
    identity: Arc<dyn IdentityProvider>,
) -> Result<VersionService> {
    observe_open("open_service", || {
        let conn = db::open(&config.store.path)?;
        tracing::debug!(path = %config.store.path.display(), "opened version database");
        build_service(conn, config, identity)
    })
}

/// Like [`open_service`] over a private in-memory database
///
/// # Errors
///
/// `InvalidConfig` for a bad retry budget, `Persistence` if migrating fails.
pub fn open_in_memory_service(
    config: &VersioningConfig,
    identity: Arc<dyn IdentityProvider>,
) -> Result<VersionService> {
    observe_open("open_in_memory_service", || {
        build_service(db::open_in_memory()?, config, identity)
    })
}

fn build_service(
    mut conn: Connection,
    config: &VersioningConfig,
    identity: Arc<dyn IdentityProvider>,
) -> Result<VersionService> {
    // fail on configuration before touching the schema
    let max_attempts = config.max_attempts()?;
    migrations::apply_migrations(&mut conn)?;

    let conn = Arc::new(Mutex::new(conn));
    let router = AssetVersionType::ALL
        .into_iter()
        .fold(TypeRouter::builder(), |builder, asset_type| {
            builder.register(
                asset_type,
                Arc::new(SqliteVersionStore::new(asset_type, Arc::clone(&conn))),
            )
        })
        .build()?;

    tracing::info!(
        max_attempts = max_attempts.get(),
        asset_types = AssetVersionType::COUNT,
        "version service ready"
    );
    VersionService::from_config(Arc::new(router), config, identity)
}

fn observe_open(
    op: &'static str,
    f: impl FnOnce() -> Result<VersionService>,
) -> Result<VersionService> {
    let started = Instant::now();
    log_op_start!(op);
    let result = f();
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms);
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetver_core::errors::ExErrorKind;
    use assetver_core::StaticIdentityProvider;

    #[test]
    fn test_in_memory_service_serves_every_type() {
        let service = open_in_memory_service(
            &VersioningConfig::default(),
            Arc::new(StaticIdentityProvider::new("alice")),
        )
        .unwrap();
        assert_eq!(
            service.router().registered_types(),
            AssetVersionType::ALL.to_vec()
        );
    }

    #[test]
    fn test_zero_attempts_fails_startup() {
        let config = VersioningConfig::default().with_max_attempts(0);
        let err = open_in_memory_service(&config, Arc::new(StaticIdentityProvider::new("alice")))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    }
}
