//! Unit-of-work runner over a registry store.
//!
//! # Responsibility
//! - Hand out exclusive persistence handles (`Store::acquire`).
//! - Bracket one operation in begin/commit with rollback on failure.
//! - Enforce run deadlines and cooperative cancellation at run boundaries.
//!
//! # Invariants
//! - A handle is never shared by two concurrent runs.
//! - Every run ends in exactly one of commit or rollback, also on panic.
//! - The handle is released before `run*` returns.

use super::open::{connect_migrated, open_db, open_db_in_memory, DEFAULT_BUSY_TIMEOUT};
use super::{DbError, DbResult};
use crate::config::{RegistryConfig, UpsertStrategy};
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Tunables applied to every unit of work of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub busy_timeout: Duration,
    /// Upper bound for a single run; `None` means unbounded.
    pub operation_timeout: Option<Duration>,
    pub upsert: UpsertStrategy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            operation_timeout: None,
            upsert: UpsertStrategy::TwoPhase,
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self {
            busy_timeout: config.busy_timeout(),
            operation_timeout: config.operation_timeout(),
            upsert: config.upsert_strategy,
        }
    }
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Deadline and cancellation state carried by one run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    deadline: Option<Instant>,
    cancel: CancelToken,
}

impl RunContext {
    pub fn new(deadline: Option<Instant>, cancel: CancelToken) -> Self {
        Self { deadline, cancel }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: CancelToken::default(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fails with `Cancelled` or `DeadlineExceeded` when the run must stop.
    pub fn check(&self) -> DbResult<()> {
        if self.cancel.is_cancelled() {
            return Err(DbError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(DbError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// `BEGIN DEFERRED`, used for read-only runs.
    Deferred,
    /// `BEGIN IMMEDIATE`, used for runs that write.
    Immediate,
}

impl TxMode {
    fn behavior(self) -> TransactionBehavior {
        match self {
            Self::Deferred => TransactionBehavior::Deferred,
            Self::Immediate => TransactionBehavior::Immediate,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Deferred => "deferred",
            Self::Immediate => "immediate",
        }
    }
}

enum StoreSource {
    File(PathBuf),
    Memory(Mutex<Connection>),
}

/// Handle factory for the registry.
///
/// File stores open a fresh connection per handle; in-memory stores lend an
/// exclusive guard over their single connection.
pub struct Store {
    source: StoreSource,
    options: StoreOptions,
    cancel: CancelToken,
}

/// Exclusive persistence handle returned by [`Store::acquire`].
pub enum StoreHandle<'a> {
    Owned(Connection),
    Shared(MutexGuard<'a, Connection>),
}

impl Deref for StoreHandle<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        match self {
            Self::Owned(conn) => conn,
            Self::Shared(guard) => guard,
        }
    }
}

impl Store {
    /// Builds a store from runtime configuration, migrating it once.
    pub fn open(config: &RegistryConfig) -> DbResult<Self> {
        let store = match &config.db_path {
            Some(path) => Self::open_file(path)?,
            None => Self::open_in_memory()?,
        };
        Ok(store.with_options(StoreOptions::from_config(config)))
    }

    pub fn open_file(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        // Migrations run here so per-run connections only apply pragmas.
        drop(open_db(&path)?);
        Ok(Self {
            source: StoreSource::File(path),
            options: StoreOptions::default(),
            cancel: CancelToken::default(),
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self {
            source: StoreSource::Memory(Mutex::new(conn)),
            options: StoreOptions::default(),
            cancel: CancelToken::default(),
        })
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn upsert_strategy(&self) -> UpsertStrategy {
        self.options.upsert
    }

    /// Token observed by every run of this store.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Fresh run context: store cancel token plus configured timeout.
    pub fn context(&self) -> RunContext {
        RunContext {
            deadline: self
                .options
                .operation_timeout
                .map(|timeout| Instant::now() + timeout),
            cancel: self.cancel.clone(),
        }
    }

    pub fn acquire(&self) -> DbResult<StoreHandle<'_>> {
        match &self.source {
            StoreSource::File(path) => connect_migrated(path, self.options.busy_timeout)
                .map(StoreHandle::Owned)
                .map_err(|err| match err {
                    DbError::Sqlite(err) => {
                        DbError::StoreUnavailable(format!("{}: {err}", path.display()))
                    }
                    other => other,
                }),
            // A poisoned guard only means an earlier run panicked; its
            // transaction was already rolled back by the guard's drop.
            StoreSource::Memory(conn) => Ok(StoreHandle::Shared(
                conn.lock().unwrap_or_else(PoisonError::into_inner),
            )),
        }
    }

    /// Runs `f` in a deferred unit of work.
    pub fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    {
        self.run_with(&self.context(), TxMode::Deferred, f)
    }

    /// Runs `f` in a unit of work that takes the write lock up front.
    pub fn run_immediate<T, E, F>(&self, f: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    {
        self.run_with(&self.context(), TxMode::Immediate, f)
    }

    pub fn run_with<T, E, F>(&self, ctx: &RunContext, mode: TxMode, f: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    {
        let started_at = Instant::now();
        ctx.check()?;

        let handle = self.acquire()?;
        let busy_timeout = match ctx.remaining() {
            Some(remaining) => remaining.min(self.options.busy_timeout),
            None => self.options.busy_timeout,
        };
        handle.busy_timeout(busy_timeout).map_err(DbError::from)?;

        // Transaction drop rolls back, which covers unwinding out of `f`.
        let tx = Transaction::new_unchecked(&handle, mode.behavior()).map_err(DbError::from)?;

        let value = match f(&tx) {
            Ok(value) => value,
            Err(err) => {
                rollback(tx, mode, started_at, "operation_failed");
                return Err(err);
            }
        };

        if let Err(err) = ctx.check() {
            rollback(tx, mode, started_at, error_code(&err));
            return Err(err.into());
        }

        tx.commit().map_err(DbError::from)?;
        debug!(
            "event=uow_commit module=db status=ok mode={} duration_ms={}",
            mode.as_str(),
            started_at.elapsed().as_millis()
        );
        Ok(value)
    }
}

fn rollback(tx: Transaction<'_>, mode: TxMode, started_at: Instant, reason: &str) {
    if let Err(err) = tx.rollback() {
        warn!(
            "event=uow_rollback module=db status=error mode={} reason={} error={}",
            mode.as_str(),
            reason,
            err
        );
        return;
    }
    debug!(
        "event=uow_rollback module=db status=ok mode={} reason={} duration_ms={}",
        mode.as_str(),
        reason,
        started_at.elapsed().as_millis()
    );
}

fn error_code(err: &DbError) -> &'static str {
    match err {
        DbError::DeadlineExceeded => "deadline_exceeded",
        DbError::Cancelled => "cancelled",
        _ => "storage_error",
    }
}
