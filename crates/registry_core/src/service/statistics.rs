//! Experiment counts per lifecycle bucket.
//!
//! # Responsibility
//! - Count a gateway's experiments created inside a time window, grouped by
//!   the state of their latest `EXPERIMENT` status.
//!
//! # Invariants
//! - The window is exclusive on both ends and always applied.
//! - Experiments without a status, or in a state no bucket names, count
//!   toward `all` only.

use super::search::{SearchSql, TimeWindow, LATEST_EXPERIMENT_STATE};
use crate::db::Store;
use crate::model::ExperimentState;
use crate::query::Statement;
use crate::resource::RegistryResult;
use crate::schema::experiment as e;
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Optional narrowing applied on top of gateway and window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatisticsFilter<'a> {
    /// Substring of the executing user.
    pub user_name: Option<&'a str>,
    /// Substring of the application id.
    pub application_id: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExperimentStatistics {
    pub all: u64,
    /// `CREATED` and `VALIDATED`.
    pub created: u64,
    /// `SCHEDULED`, `LAUNCHED` and `EXECUTING`.
    pub running: u64,
    pub completed: u64,
    pub failed: u64,
    /// `CANCELING` and `CANCELED`.
    pub cancelled: u64,
}

impl ExperimentStatistics {
    fn tally(&mut self, state: Option<ExperimentState>, count: u64) {
        self.all += count;
        let bucket = match state {
            Some(ExperimentState::Created | ExperimentState::Validated) => &mut self.created,
            Some(
                ExperimentState::Scheduled
                | ExperimentState::Launched
                | ExperimentState::Executing,
            ) => &mut self.running,
            Some(ExperimentState::Completed) => &mut self.completed,
            Some(ExperimentState::Failed) => &mut self.failed,
            Some(ExperimentState::Canceling | ExperimentState::Canceled) => &mut self.cancelled,
            Some(ExperimentState::Suspended | ExperimentState::Unknown) | None => return,
        };
        *bucket += count;
    }
}

pub fn experiment_statistics(
    store: &Store,
    gateway_id: &str,
    window: TimeWindow,
    filter: StatisticsFilter<'_>,
) -> RegistryResult<ExperimentStatistics> {
    let started_at = Instant::now();

    let mut search = SearchSql::new(e::TABLE);
    search.equals(e::GATEWAY_ID, gateway_id);
    search.within(e::CREATION_TIME, window);
    if let Some(user_name) = filter.user_name {
        search.filter(e::EXECUTION_USER, false, user_name);
    }
    if let Some(application_id) = filter.application_id {
        search.filter(e::APPLICATION_ID, false, application_id);
    }

    let projection = format!(
        "{} AS latest_state, COUNT(*) AS total",
        LATEST_EXPERIMENT_STATE.as_str()
    );
    let (mut sql, params) = search.select(&projection);
    sql.push_str(" GROUP BY latest_state");
    let statement = Statement::new(sql, params);

    let groups = store.run(|tx| -> RegistryResult<Vec<(Option<String>, i64)>> {
        statement
            .fetch(tx)?
            .iter()
            .map(|record| -> RegistryResult<(Option<String>, i64)> {
                Ok((record.opt_text("latest_state")?, record.int("total")?))
            })
            .collect()
    })?;

    let mut statistics = ExperimentStatistics::default();
    for (state, total) in groups {
        let state = state.as_deref().and_then(ExperimentState::parse);
        statistics.tally(state, u64::try_from(total).unwrap_or(0));
    }

    debug!(
        "event=experiment_statistics module=service status=ok all={} duration_ms={}",
        statistics.all,
        started_at.elapsed().as_millis()
    );
    Ok(statistics)
}

#[cfg(test)]
mod tests {
    use super::ExperimentStatistics;
    use crate::model::ExperimentState;

    #[test]
    fn states_fold_into_buckets() {
        let mut statistics = ExperimentStatistics::default();
        statistics.tally(Some(ExperimentState::Validated), 2);
        statistics.tally(Some(ExperimentState::Launched), 1);
        statistics.tally(Some(ExperimentState::Canceling), 1);
        statistics.tally(Some(ExperimentState::Suspended), 4);
        statistics.tally(None, 1);

        assert_eq!(
            statistics,
            ExperimentStatistics {
                all: 9,
                created: 2,
                running: 1,
                completed: 0,
                failed: 0,
                cancelled: 1,
            }
        );
    }
}
