//! Connection bootstrap for the registry database.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Apply the pragmas the registry schema depends on.
//! - Migrate a database once, when its store is opened.
//!
//! # Invariants
//! - Every returned connection has `foreign_keys=ON` and a busy timeout.
//! - `open_db*` connections are fully migrated; `connect_migrated` assumes it.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

pub(crate) const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Copy)]
enum Target<'a> {
    File(&'a Path),
    Memory,
}

impl Target<'_> {
    fn mode(self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }

    fn connect(self) -> rusqlite::Result<Connection> {
        match self {
            Self::File(path) => Connection::open(path),
            Self::Memory => Connection::open_in_memory(),
        }
    }
}

/// Opens a registry database file and applies all pending migrations.
///
/// Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    bootstrap(Target::File(path.as_ref()), DEFAULT_BUSY_TIMEOUT)
}

/// Opens an in-memory registry; every call yields an independent, empty one.
pub fn open_db_in_memory() -> DbResult<Connection> {
    bootstrap(Target::Memory, DEFAULT_BUSY_TIMEOUT)
}

/// Connects to a file database whose store already migrated it.
pub(crate) fn connect_migrated(path: &Path, busy_timeout: Duration) -> DbResult<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn, busy_timeout)?;
    Ok(conn)
}

fn bootstrap(target: Target<'_>, busy_timeout: Duration) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = target.mode();
    info!("event=db_open module=db status=start mode={mode}");

    let result = target
        .connect()
        .map_err(|err| ("db_open_failed", DbError::from(err)))
        .and_then(|mut conn| {
            let prepared =
                configure(&conn, busy_timeout).and_then(|()| apply_migrations(&mut conn));
            match prepared {
                Ok(()) => Ok(conn),
                Err(err) => Err(("db_bootstrap_failed", err)),
            }
        });

    let elapsed = started_at.elapsed().as_millis();
    match result {
        Ok(conn) => {
            info!("event=db_open module=db status=ok mode={mode} duration_ms={elapsed}");
            Ok(conn)
        }
        Err((code, err)) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={elapsed} error_code={code} error={err}"
            );
            Err(err)
        }
    }
}

fn configure(conn: &Connection, busy_timeout: Duration) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}
