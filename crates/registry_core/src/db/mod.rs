//! SQLite storage bootstrap, schema migration and unit-of-work entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the registry.
//! - Apply schema migrations in deterministic order.
//! - Bracket every registry operation in one begin/commit/rollback cycle.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Registry code must not read/write data before migrations succeed.
//! - A handle is owned by exactly one unit of work at a time.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod unit_of_work;

pub use open::{open_db, open_db_in_memory};
pub use unit_of_work::{CancelToken, RunContext, Store, StoreHandle, StoreOptions, TxMode};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// The run context deadline passed before the unit of work committed.
    DeadlineExceeded,
    /// The store's cancel token was triggered.
    Cancelled,
    /// The backing store could not hand out a handle.
    StoreUnavailable(String),
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
            Self::DeadlineExceeded => write!(f, "operation deadline exceeded"),
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::StoreUnavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::DeadlineExceeded => None,
            Self::Cancelled => None,
            Self::StoreUnavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
