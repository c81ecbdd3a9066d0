use registry_core::db::migrations::{current_user_version, latest_version};
use registry_core::db::{open_db, open_db_in_memory, DbError, Store};
use rusqlite::Connection;

const REGISTRY_TABLES: &[&str] = &[
    "gateway",
    "users",
    "gateway_worker",
    "project",
    "experiment",
    "experiment_input",
    "experiment_output",
    "experiment_config_data",
    "workflow_node_detail",
    "task_detail",
    "job_detail",
    "data_transfer_detail",
    "status",
    "error_detail",
    "host_descriptor",
    "application_descriptor",
    "user_workflow",
    "configuration",
];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    for table in REGISTRY_TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn_second).unwrap(), latest_version());
    assert_table_exists(&conn_second, "experiment");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match Store::open_file(&path) {
        Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("future schema must be rejected"),
    }
}

#[test]
fn foreign_keys_are_enforced_on_every_handle() {
    let store = Store::open_in_memory().unwrap();
    let handle = store.acquire().unwrap();

    let err = handle
        .execute(
            "INSERT INTO project (project_id, gateway_id, user_name) VALUES ('p1', 'g1', 'alice')",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
