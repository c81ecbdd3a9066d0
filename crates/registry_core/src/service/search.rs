//! Filtered, paged search over projects and experiments.
//!
//! # Responsibility
//! - Translate typed field filters into one bound SELECT per call.
//! - Apply creation-time windows, access lists, ordering and paging in SQL.
//!
//! # Invariants
//! - Column names come only from the field enums; values are always bound.
//! - Text filters match substrings with `LIKE ... ESCAPE '\'`; `%`, `_` and
//!   `\` in caller input are matched literally.
//! - Creation windows are exclusive on both ends and ignored unless
//!   `to_ms > from_ms`.
//! - Ordering is deterministic: `creation_time`, then primary key.

use crate::db::Store;
use crate::model::{ExperimentState, StatusType};
use crate::query::Statement;
use crate::resource::{materialize, RegistryError, RegistryResult, Resource, ResourceType};
use crate::schema::{experiment as e, owner, project as p, status as s};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::types::Value;
use std::time::Instant;

static LIKE_SPECIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\\%_]").expect("valid like-escape regex"));

/// State of the newest `EXPERIMENT` status of the experiment row in scope.
pub(super) static LATEST_EXPERIMENT_STATE: Lazy<String> = Lazy::new(|| {
    format!(
        "(SELECT st.{state} FROM {status} st \
         WHERE st.{owner} = {experiment}.{id} AND st.{kind} = '{tag}' \
         ORDER BY st.{updated} DESC, st.rowid DESC LIMIT 1)",
        state = s::STATE,
        status = s::TABLE,
        owner = owner::EXPERIMENT_ID,
        experiment = e::TABLE,
        id = e::EXPERIMENT_ID,
        kind = s::STATUS_TYPE,
        tag = StatusType::Experiment.as_str(),
        updated = s::STATUS_UPDATE_TIME,
    )
});

/// Searchable project columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    ProjectId,
    ProjectName,
    Description,
}

impl ProjectField {
    fn apply(self, search: &mut SearchSql, value: &str) {
        match self {
            Self::ProjectId => search.filter(p::PROJECT_ID, true, value),
            Self::ProjectName => search.filter(p::PROJECT_NAME, false, value),
            Self::Description => search.filter(p::DESCRIPTION, false, value),
        }
    }
}

/// Searchable experiment attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentField {
    ExperimentId,
    Name,
    Description,
    ApplicationId,
    ProjectId,
    /// State of the latest `EXPERIMENT` status, e.g. `"EXECUTING"`.
    State,
}

impl ExperimentField {
    fn apply(self, search: &mut SearchSql, value: &str) -> RegistryResult<()> {
        let (column, exact) = match self {
            Self::ExperimentId => (e::EXPERIMENT_ID, true),
            Self::Name => (e::EXPERIMENT_NAME, false),
            Self::Description => (e::DESCRIPTION, false),
            Self::ApplicationId => (e::APPLICATION_ID, true),
            Self::ProjectId => (e::PROJECT_ID, true),
            Self::State => return search.latest_state(value),
        };
        search.filter(column, exact, value);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Paging, ordering and access restriction for search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// `None` returns every match.
    pub limit: Option<u32>,
    pub offset: u32,
    pub order: SortOrder,
    /// Primary keys the caller may see. `None` means unrestricted; an empty
    /// list means nothing is accessible.
    pub accessible_ids: Option<Vec<String>>,
}

/// Exclusive creation-time bounds in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from_ms: i64,
    pub to_ms: i64,
}

impl TimeWindow {
    /// `false` for empty or inverted windows, which searches ignore.
    pub fn is_ordered(&self) -> bool {
        self.to_ms > self.from_ms
    }
}

/// Projects owned by `user_name` in `gateway_id` matching every filter.
///
/// Blank filter values are ignored.
pub fn search_projects(
    store: &Store,
    gateway_id: &str,
    user_name: &str,
    filters: &[(ProjectField, &str)],
    options: &SearchOptions,
) -> RegistryResult<Vec<Resource>> {
    let mut search = SearchSql::new(p::TABLE);
    search.equals(p::GATEWAY_ID, gateway_id);
    search.equals(p::USER_NAME, user_name);
    for (field, value) in filters {
        field.apply(&mut search, value);
    }
    search.run(
        store,
        ResourceType::Project,
        (p::CREATION_TIME, p::PROJECT_ID),
        options,
    )
}

/// Experiments executed by `user_name` in `gateway_id` matching every
/// filter and, when given an ordered window, created strictly inside it.
///
/// # Errors
/// - `Validation` when an `ExperimentField::State` value names no state.
pub fn search_experiments(
    store: &Store,
    gateway_id: &str,
    user_name: &str,
    filters: &[(ExperimentField, &str)],
    created: Option<TimeWindow>,
    options: &SearchOptions,
) -> RegistryResult<Vec<Resource>> {
    let mut search = SearchSql::new(e::TABLE);
    search.equals(e::GATEWAY_ID, gateway_id);
    search.equals(e::EXECUTION_USER, user_name);
    for (field, value) in filters {
        field.apply(&mut search, value)?;
    }
    if let Some(window) = created.filter(TimeWindow::is_ordered) {
        search.within(e::CREATION_TIME, window);
    }
    search.run(
        store,
        ResourceType::Experiment,
        (e::CREATION_TIME, e::EXPERIMENT_ID),
        options,
    )
}

/// WHERE-clause accumulator shared by search and statistics queries.
pub(super) struct SearchSql {
    table: &'static str,
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl SearchSql {
    pub(super) fn new(table: &'static str) -> Self {
        Self {
            table,
            clauses: Vec::new(),
            params: Vec::new(),
        }
    }

    pub(super) fn equals(&mut self, column: &'static str, value: &str) {
        self.clauses.push(format!("{column} = ?"));
        self.params.push(Value::Text(value.to_string()));
    }

    /// Exact or substring match; blank values add nothing.
    pub(super) fn filter(&mut self, column: &'static str, exact: bool, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if exact {
            self.equals(column, value);
        } else {
            self.contains(column, value);
        }
    }

    pub(super) fn contains(&mut self, column: &'static str, value: &str) {
        self.clauses.push(format!("{column} LIKE ? ESCAPE '\\'"));
        self.params
            .push(Value::Text(format!("%{}%", escape_like(value))));
    }

    pub(super) fn within(&mut self, column: &'static str, window: TimeWindow) {
        self.clauses.push(format!("{column} > ? AND {column} < ?"));
        self.params.push(Value::Integer(window.from_ms));
        self.params.push(Value::Integer(window.to_ms));
    }

    fn latest_state(&mut self, value: &str) -> RegistryResult<()> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        let state = ExperimentState::parse(value).ok_or_else(|| {
            RegistryError::Validation(format!("unknown experiment state `{value}`"))
        })?;
        self.clauses
            .push(format!("{} = ?", LATEST_EXPERIMENT_STATE.as_str()));
        self.params.push(Value::Text(state.as_str().to_string()));
        Ok(())
    }

    fn restrict_to(&mut self, key_column: &'static str, ids: &[String]) {
        let placeholders = vec!["?"; ids.len()].join(", ");
        self.clauses.push(format!("{key_column} IN ({placeholders})"));
        self.params
            .extend(ids.iter().map(|id| Value::Text(id.clone())));
    }

    pub(super) fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// `SELECT <projection> FROM <table> [WHERE ...]` plus bound values.
    pub(super) fn select(self, projection: &str) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {projection} FROM {}", self.table);
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        (sql, self.params)
    }

    fn run(
        mut self,
        store: &Store,
        kind: ResourceType,
        (time_column, key_column): (&'static str, &'static str),
        options: &SearchOptions,
    ) -> RegistryResult<Vec<Resource>> {
        if options.limit == Some(0) {
            return Ok(Vec::new());
        }
        if let Some(ids) = &options.accessible_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            self.restrict_to(key_column, ids);
        }
        let started_at = Instant::now();
        let filters = self.clause_count();

        let direction = options.order.as_sql();
        let (mut sql, mut params) = self.select("*");
        sql.push_str(&format!(
            " ORDER BY {time_column} {direction}, {key_column} {direction} LIMIT ? OFFSET ?"
        ));
        // SQLite reads a negative LIMIT as unbounded.
        params.push(Value::Integer(options.limit.map_or(-1, i64::from)));
        params.push(Value::Integer(i64::from(options.offset)));

        let statement = Statement::new(sql, params);
        let found = store.run(|tx| -> RegistryResult<Vec<Resource>> {
            statement
                .fetch(tx)?
                .iter()
                .map(|record| materialize(tx, kind, record))
                .collect()
        })?;

        debug!(
            "event=resource_search module=service status=ok kind={} filters={} count={} duration_ms={}",
            kind,
            filters,
            found.len(),
            started_at.elapsed().as_millis()
        );
        Ok(found)
    }
}

fn escape_like(value: &str) -> String {
    LIKE_SPECIAL.replace_all(value, r"\$0").into_owned()
}
