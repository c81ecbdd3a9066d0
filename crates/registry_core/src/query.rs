//! Parameterized statement assembly and raw record access.
//!
//! # Responsibility
//! - Turn a table name plus ordered equality constraints into SELECT/DELETE.
//! - Execute rendered statements against an open unit of work.
//! - Expose fetched rows as name-addressable `Record`s.
//!
//! # Invariants
//! - Caller values are always bound, never spliced into SQL text.
//! - Identifiers are `&'static str` constants from `crate::schema`.
//! - Constraints render in insertion order, AND-joined.

use crate::db::{DbError, DbResult};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::fmt::Write as _;

/// Builds one equality-filtered statement over a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    table: &'static str,
    params: Vec<(&'static str, Value)>,
}

impl QueryBuilder {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            params: Vec::new(),
        }
    }

    /// Adds `field = value`; a `Null` value renders as `field IS NULL`.
    pub fn set_parameter(&mut self, field: &'static str, value: impl Into<Value>) -> &mut Self {
        self.params.push((field, value.into()));
        self
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn select_query(&self) -> Statement {
        self.render(&format!("SELECT * FROM {}", self.table))
    }

    /// Without parameters this deletes every row of the table.
    pub fn delete_query(&self) -> Statement {
        self.render(&format!("DELETE FROM {}", self.table))
    }

    fn render(&self, head: &str) -> Statement {
        let mut sql = head.to_string();
        let mut bound = Vec::with_capacity(self.params.len());

        for (index, (field, value)) in self.params.iter().enumerate() {
            sql.push_str(if index == 0 { " WHERE " } else { " AND " });
            if matches!(value, Value::Null) {
                let _ = write!(sql, "{field} IS NULL");
            } else {
                bound.push(value.clone());
                let _ = write!(sql, "{field} = ?{}", bound.len());
            }
        }

        Statement { sql, params: bound }
    }
}

/// Rendered SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Runs a query and collects every row in storage order.
    pub fn fetch(&self, conn: &Connection) -> DbResult<Vec<Record>> {
        let mut stmt = conn.prepare(&self.sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = columns.len();

        let mut rows = stmt.query(params_from_iter(self.params.iter()))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for index in 0..width {
                values.push(row.get::<_, Value>(index)?);
            }
            records.push(Record {
                columns: columns.clone(),
                values,
            });
        }
        Ok(records)
    }

    /// Runs a mutation and returns the affected row count.
    pub fn execute(&self, conn: &Connection) -> DbResult<usize> {
        conn.execute(&self.sql, params_from_iter(self.params.iter()))
            .map_err(DbError::from)
    }
}

/// One persisted row: column names and values in select order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    pub fn from_row(row: Vec<(&str, Value)>) -> Self {
        let (columns, values) = row
            .into_iter()
            .map(|(column, value)| (column.to_string(), value))
            .unzip();
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|index| &self.values[index])
    }

    /// Replaces or appends a column value.
    pub fn set(&mut self, column: &str, value: Value) {
        match self.columns.iter().position(|name| name == column) {
            Some(index) => self.values[index] = value,
            None => {
                self.columns.push(column.to_string());
                self.values.push(value);
            }
        }
    }

    pub fn opt_text(&self, column: &str) -> Result<Option<String>, RecordError> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Text(text)) => Ok(Some(text.clone())),
            Some(Value::Integer(number)) => Ok(Some(number.to_string())),
            Some(_) => Err(RecordError::new(column, "expected text")),
        }
    }

    /// Text column; NULL and absent columns decode as empty.
    pub fn text(&self, column: &str) -> Result<String, RecordError> {
        Ok(self.opt_text(column)?.unwrap_or_default())
    }

    pub fn opt_int(&self, column: &str) -> Result<Option<i64>, RecordError> {
        match self.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Integer(number)) => Ok(Some(*number)),
            Some(Value::Text(text)) => text
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| RecordError::new(column, "expected integer")),
            Some(_) => Err(RecordError::new(column, "expected integer")),
        }
    }

    pub fn int(&self, column: &str) -> Result<i64, RecordError> {
        Ok(self.opt_int(column)?.unwrap_or_default())
    }

    pub fn bool(&self, column: &str) -> Result<bool, RecordError> {
        match self.opt_int(column)? {
            None | Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(_) => Err(RecordError::new(column, "expected 0 or 1")),
        }
    }
}

/// A persisted column could not be decoded into the requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    pub column: String,
    pub message: &'static str,
}

impl RecordError {
    fn new(column: &str, message: &'static str) -> Self {
        Self {
            column: column.to_string(),
            message,
        }
    }
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "column `{}`: {}", self.column, self.message)
    }
}

impl std::error::Error for RecordError {}
