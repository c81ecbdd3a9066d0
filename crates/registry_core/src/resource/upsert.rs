//! Find-then-upsert protocol behind `ResourceNode::save`.
//!
//! # Responsibility
//! - Validate primary key and ownership invariants before any write.
//! - Persist a resource as insert-or-merge by primary key.
//!
//! # Invariants
//! - Two-phase saves use two units of work: a read, then a write. A
//!   concurrent writer with the same key between them can still cause a
//!   duplicate-key failure or a lost update.
//! - Both units of work share one run context, so the store's operation
//!   timeout bounds the whole save.
//! - Single-statement saves never use `INSERT OR REPLACE`, which would
//!   delete and cascade to children.
//! - Key columns are never rewritten by a merge.

use super::{is_blank, EntityData, RegistryError, RegistryResult, Resource, TableDef};
use crate::config::UpsertStrategy;
use crate::db::{RunContext, Store, TxMode};
use crate::query::{QueryBuilder, Statement};
use log::debug;
use rusqlite::types::Value;
use std::fmt::Write as _;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveAction {
    Inserted,
    Updated,
    Unchanged,
    Upserted,
}

impl SaveAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Inserted => "insert",
            Self::Updated => "update",
            Self::Unchanged => "unchanged",
            Self::Upserted => "upsert",
        }
    }
}

pub(super) fn save(resource: &Resource, store: &Store) -> RegistryResult<()> {
    save_with(resource, store, &store.context())
}

/// Saves under a caller-provided deadline and cancel token.
pub(crate) fn save_with(
    resource: &Resource,
    store: &Store,
    ctx: &RunContext,
) -> RegistryResult<()> {
    let started_at = Instant::now();
    validate(resource)?;

    let def = resource.kind().table_def();
    let row = resource.data().to_row();
    let strategy = store.upsert_strategy();

    let action = match strategy {
        UpsertStrategy::TwoPhase => save_two_phase(store, ctx, def, &row)?,
        UpsertStrategy::SingleStatement => save_single_statement(store, ctx, def, &row)?,
    };

    debug!(
        "event=resource_save module=resource status=ok kind={} strategy={} action={} duration_ms={}",
        resource.kind(),
        strategy.as_str(),
        action.as_str(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}

/// Rejects resources that cannot be addressed by primary key.
pub(super) fn validate(resource: &Resource) -> RegistryResult<()> {
    for (column, value) in resource.key() {
        if is_blank(&value) {
            return Err(RegistryError::Validation(format!(
                "{} key column `{column}` is blank",
                resource.kind()
            )));
        }
    }

    if let EntityData::Status(status) = resource.data() {
        let owners = status.owners.present();
        if owners.len() != 1 {
            return Err(RegistryError::Validation(format!(
                "status `{}` must have exactly one owner, found {}",
                status.status_id,
                owners.len()
            )));
        }
    }

    Ok(())
}

fn save_two_phase(
    store: &Store,
    ctx: &RunContext,
    def: TableDef,
    row: &[(&'static str, Value)],
) -> RegistryResult<SaveAction> {
    let mut find = QueryBuilder::new(def.table);
    for (column, value) in key_values(def, row) {
        find.set_parameter(column, value.clone());
    }
    let lookup = find.select_query();
    let found = store.run_with(ctx, TxMode::Deferred, |tx| -> RegistryResult<bool> {
        Ok(!lookup.fetch(tx)?.is_empty())
    })?;

    let statement = if found {
        match update_statement(def, row) {
            Some(statement) => statement,
            None => return Ok(SaveAction::Unchanged),
        }
    } else {
        insert_statement(def, row)
    };

    store.run_with(ctx, TxMode::Immediate, |tx| -> RegistryResult<()> {
        statement.execute(tx)?;
        Ok(())
    })?;

    Ok(if found {
        SaveAction::Updated
    } else {
        SaveAction::Inserted
    })
}

fn save_single_statement(
    store: &Store,
    ctx: &RunContext,
    def: TableDef,
    row: &[(&'static str, Value)],
) -> RegistryResult<SaveAction> {
    let statement = upsert_statement(def, row);
    store.run_with(ctx, TxMode::Immediate, |tx| -> RegistryResult<()> {
        statement.execute(tx)?;
        Ok(())
    })?;
    Ok(SaveAction::Upserted)
}

fn key_values<'a>(
    def: TableDef,
    row: &'a [(&'static str, Value)],
) -> impl Iterator<Item = (&'static str, &'a Value)> {
    row.iter()
        .filter(move |(column, _)| def.is_key_column(column))
        .map(|(column, value)| (*column, value))
}

/// `None` when every column is part of the primary key.
fn update_statement(def: TableDef, row: &[(&'static str, Value)]) -> Option<Statement> {
    let mut sql = format!("UPDATE {} SET ", def.table);
    let mut params = Vec::with_capacity(row.len());

    for (column, value) in row.iter().filter(|(column, _)| !def.is_key_column(column)) {
        if !params.is_empty() {
            sql.push_str(", ");
        }
        params.push(value.clone());
        let _ = write!(sql, "{column} = ?{}", params.len());
    }
    if params.is_empty() {
        return None;
    }

    for (index, (column, value)) in key_values(def, row).enumerate() {
        sql.push_str(if index == 0 { " WHERE " } else { " AND " });
        params.push(value.clone());
        let _ = write!(sql, "{column} = ?{}", params.len());
    }

    Some(Statement::new(sql, params))
}

fn insert_statement(def: TableDef, row: &[(&'static str, Value)]) -> Statement {
    let columns: Vec<&str> = row.iter().map(|(column, _)| *column).collect();
    let placeholders: Vec<String> = (1..=row.len()).map(|index| format!("?{index}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        def.table,
        columns.join(", "),
        placeholders.join(", ")
    );
    Statement::new(sql, row.iter().map(|(_, value)| value.clone()).collect())
}

fn upsert_statement(def: TableDef, row: &[(&'static str, Value)]) -> Statement {
    let mut statement = insert_statement(def, row);
    let updates: Vec<String> = row
        .iter()
        .filter(|(column, _)| !def.is_key_column(column))
        .map(|(column, _)| format!("{column} = excluded.{column}"))
        .collect();

    let _ = write!(
        statement.sql,
        " ON CONFLICT ({}) DO ",
        def.key_columns.join(", ")
    );
    if updates.is_empty() {
        statement.sql.push_str("NOTHING");
    } else {
        let _ = write!(statement.sql, "UPDATE SET {}", updates.join(", "));
    }
    statement
}
