//! Connection handling for the `SQLite` backend.
//!
//! Every session opens its own connection. The store file must already exist
//! for a session to open; creating it is the job of
//! [`SqliteContextFactory::ensure_created`](super::SqliteContextFactory::ensure_created).

use crate::{Error, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

/// How long a connection waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a session connection against an existing database file.
///
/// # Errors
///
/// Returns [`Error::StoreUnavailable`] if the file is missing or cannot be
/// opened.
pub fn open_existing(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let conn = Connection::open_with_flags(path, flags).map_err(|e| unavailable(path, &e))?;
    configure_connection(&conn).map_err(|e| unavailable(path, &e))?;
    Ok(conn)
}

/// Opens a connection, creating the database file and its parent directory
/// if needed.
///
/// # Errors
///
/// Returns [`Error::StoreUnavailable`] if the directory or file cannot be created.
pub fn open_or_create(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| unavailable(path, &e))?;
    }

    let conn = Connection::open(path).map_err(|e| unavailable(path, &e))?;
    // WAL is persistent, so it only needs setting when the file is created.
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    configure_connection(&conn).map_err(|e| unavailable(path, &e))?;
    Ok(conn)
}

/// Applies per-connection settings.
///
/// # Configuration Applied
///
/// - **NORMAL synchronous**: Balances durability with performance
/// - **`busy_timeout`**: Waits up to [`BUSY_TIMEOUT`] on lock contention instead of failing
///
/// # Errors
///
/// Returns the underlying error if the busy timeout cannot be set.
pub fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    conn.busy_timeout(BUSY_TIMEOUT)
}

fn unavailable(path: &Path, cause: &dyn std::fmt::Display) -> Error {
    Error::StoreUnavailable {
        location: path.display().to_string(),
        cause: cause.to_string(),
    }
}
