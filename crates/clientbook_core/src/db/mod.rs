//! SQLite storage bootstrap, schema migrations and the shared connection.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the client book.
//! - Apply schema migrations in deterministic order.
//! - Hold the single process-wide connection used by the CLI.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No client rows are read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;
pub mod shared;

pub use open::{open_db, open_db_in_memory};
pub use shared::{shared_connection, shared_connection_path};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    SharedPathConflict {
        active: PathBuf,
        requested: PathBuf,
    },
    SharedLockPoisoned,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::SharedPathConflict { active, requested } => write!(
                f,
                "shared connection already open at `{}`; refusing to switch to `{}`",
                active.display(),
                requested.display()
            ),
            Self::SharedLockPoisoned => {
                write!(f, "shared connection lock was poisoned by a panic")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::SharedPathConflict { .. }
            | Self::SharedLockPoisoned => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
