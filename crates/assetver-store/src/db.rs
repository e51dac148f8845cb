//! Database connection management

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::errors::{from_rusqlite, io_error, Result};

/// How long a writer waits on a locked database before giving up
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite database at the given path, creating parent directories
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error("open_db", e))?;
    }
    let conn = Connection::open(path).map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Configure a connection for several writers sharing one file
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(from_rusqlite)?;

    conn.busy_timeout(BUSY_TIMEOUT).map_err(from_rusqlite)?;

    // journal_mode returns a row, so it cannot go through execute()
    let _mode: String = conn
        .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(from_rusqlite)?;

    Ok(())
}
