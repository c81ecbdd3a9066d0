use registry_core::db::{CancelToken, DbError, RunContext, Store, StoreOptions, TxMode};
use registry_core::model::Gateway;
use registry_core::{RegistryConfig, RegistryError, RegistryResult, Resource, ResourceNode};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

fn gateway_count(store: &Store) -> i64 {
    store
        .run(|tx| -> Result<i64, DbError> {
            Ok(tx.query_row("SELECT COUNT(*) FROM gateway", [], |row| row.get(0))?)
        })
        .unwrap()
}

fn insert_gateway(tx: &rusqlite::Transaction<'_>, id: &str) -> Result<(), DbError> {
    tx.execute("INSERT INTO gateway (gateway_id) VALUES (?1)", [id])?;
    Ok(())
}

#[test]
fn failed_run_rolls_back_every_write() {
    let store = Store::open_in_memory().unwrap();

    let result = store.run_immediate(|tx| -> RegistryResult<()> {
        insert_gateway(tx, "g1")?;
        Err(RegistryError::Validation("abort".to_string()))
    });

    assert!(matches!(result, Err(RegistryError::Validation(_))));
    assert_eq!(gateway_count(&store), 0);
}

#[test]
fn panicking_run_rolls_back_and_releases_the_handle() {
    let store = Store::open_in_memory().unwrap();

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _ = store.run_immediate(|tx| -> Result<(), DbError> {
            insert_gateway(tx, "g1")?;
            panic!("boom");
        });
    }));
    assert!(outcome.is_err());

    // The in-memory guard is usable again and nothing was committed.
    assert_eq!(gateway_count(&store), 0);
    store
        .run_immediate(|tx| insert_gateway(tx, "g2"))
        .unwrap();
    assert_eq!(gateway_count(&store), 1);
}

#[test]
fn cancelled_token_aborts_before_begin() {
    let store = Store::open_in_memory().unwrap();
    store.cancel_token().cancel();

    let mut invoked = false;
    let result = store.run(|_tx| -> Result<(), DbError> {
        invoked = true;
        Ok(())
    });

    assert!(matches!(result, Err(DbError::Cancelled)));
    assert!(!invoked);
}

#[test]
fn cancellation_during_run_rolls_back_before_commit() {
    let store = Store::open_in_memory().unwrap();
    let token = CancelToken::new();
    let ctx = RunContext::new(None, token.clone());

    let result = store.run_with(&ctx, TxMode::Immediate, |tx| -> Result<(), DbError> {
        insert_gateway(tx, "g1")?;
        token.cancel();
        Ok(())
    });

    assert!(matches!(result, Err(DbError::Cancelled)));
    assert_eq!(gateway_count(&store), 0);
}

#[test]
fn deadline_passing_mid_run_rolls_back() {
    let store = Store::open_in_memory().unwrap();
    let ctx = RunContext::new(
        Some(Instant::now() + Duration::from_millis(20)),
        CancelToken::new(),
    );

    let result = store.run_with(&ctx, TxMode::Immediate, |tx| -> Result<(), DbError> {
        insert_gateway(tx, "g1")?;
        std::thread::sleep(Duration::from_millis(40));
        Ok(())
    });

    assert!(matches!(result, Err(DbError::DeadlineExceeded)));
    assert_eq!(gateway_count(&store), 0);
}

#[test]
fn operation_timeout_applies_to_resource_calls() {
    let store = Store::open_in_memory().unwrap().with_options(StoreOptions {
        operation_timeout: Some(Duration::ZERO),
        ..StoreOptions::default()
    });

    let gateway = Resource::from_entity(Gateway {
        gateway_id: "g1".to_string(),
        ..Gateway::default()
    });
    let err = gateway.save(&store).unwrap_err();
    assert!(matches!(err, RegistryError::Storage(DbError::DeadlineExceeded)));
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = RegistryConfig {
        db_path: Some(dir.path().join("registry.db")),
        ..RegistryConfig::default()
    };

    {
        let store = Store::open(&config).unwrap();
        store.run_immediate(|tx| insert_gateway(tx, "g1")).unwrap();
    }

    let reopened = Store::open(&config).unwrap();
    assert_eq!(gateway_count(&reopened), 1);
}

#[test]
fn file_store_runs_use_independent_connections() {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open_file(dir.path().join("registry.db")).unwrap();

    let first = store.acquire().unwrap();
    let second = store.acquire().unwrap();
    let enabled: i64 = second
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
    drop(first);
}

#[test]
fn vanished_file_store_reports_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    let store = Store::open_file(nested.join("registry.db")).unwrap();
    std::fs::remove_dir_all(&nested).unwrap();

    let err = store.run(|tx| insert_gateway(tx, "g1")).unwrap_err();
    match err {
        DbError::StoreUnavailable(message) => assert!(message.contains("registry.db")),
        other => panic!("expected StoreUnavailable, got {other}"),
    }
}
