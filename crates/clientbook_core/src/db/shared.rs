//! Process-wide shared SQLite connection.
//!
//! # Invariants
//! - At most one shared connection is opened per process.
//! - Requests for a different path than the active one are rejected.

use super::{open_db, DbError, DbResult};
use log::info;
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

static SHARED_DB: OnceCell<SharedDb> = OnceCell::new();

struct SharedDb {
    path: PathBuf,
    conn: Mutex<Connection>,
}

/// Returns the shared connection, opening it on first use.
///
/// # Errors
/// - `SharedPathConflict` when already open for another path.
/// - Any `open_db` failure on first use.
pub fn shared_connection(path: impl AsRef<Path>) -> DbResult<&'static Mutex<Connection>> {
    let requested = path.as_ref().to_path_buf();

    let shared = SHARED_DB.get_or_try_init(|| -> DbResult<SharedDb> {
        let conn = open_db(&requested)?;
        info!(
            "event=shared_db_init module=db status=ok path={}",
            requested.display()
        );
        Ok(SharedDb {
            path: requested.clone(),
            conn: Mutex::new(conn),
        })
    })?;

    if shared.path != requested {
        return Err(DbError::SharedPathConflict {
            active: shared.path.clone(),
            requested,
        });
    }

    Ok(&shared.conn)
}

/// Returns the path of the active shared connection, if any.
pub fn shared_connection_path() -> Option<PathBuf> {
    SHARED_DB.get().map(|shared| shared.path.clone())
}
