//! Status and error records attachable to several kinds of owner.
//!
//! # Invariants
//! - A persisted status has exactly one owner column set.
//! - `status_type` names the owner kind; job statuses may also use
//!   `APPLICATION` for the application-level state of the same job.

use super::{flag, int, new_id, now_millis, opt_text, text, Entity};
use crate::query::{Record, RecordError};
use crate::resource::ResourceType;
use crate::schema::{error_detail as ed, owner, status as s};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusType {
    #[default]
    Experiment,
    WorkflowNode,
    Task,
    Job,
    Application,
    DataTransfer,
}

impl StatusType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Experiment => "EXPERIMENT",
            Self::WorkflowNode => "WORKFLOW_NODE",
            Self::Task => "TASK",
            Self::Job => "JOB",
            Self::Application => "APPLICATION",
            Self::DataTransfer => "DATA_TRANSFER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "EXPERIMENT" => Some(Self::Experiment),
            "WORKFLOW_NODE" => Some(Self::WorkflowNode),
            "TASK" => Some(Self::Task),
            "JOB" => Some(Self::Job),
            "APPLICATION" => Some(Self::Application),
            "DATA_TRANSFER" => Some(Self::DataTransfer),
            _ => None,
        }
    }
}

/// Lifecycle states recorded by `EXPERIMENT` statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperimentState {
    Created,
    Validated,
    Scheduled,
    Launched,
    Executing,
    Canceling,
    Canceled,
    Suspended,
    Completed,
    Failed,
    Unknown,
}

impl ExperimentState {
    pub const ALL: [ExperimentState; 11] = [
        Self::Created,
        Self::Validated,
        Self::Scheduled,
        Self::Launched,
        Self::Executing,
        Self::Canceling,
        Self::Canceled,
        Self::Suspended,
        Self::Completed,
        Self::Failed,
        Self::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Validated => "VALIDATED",
            Self::Scheduled => "SCHEDULED",
            Self::Launched => "LAUNCHED",
            Self::Executing => "EXECUTING",
            Self::Canceling => "CANCELING",
            Self::Canceled => "CANCELED",
            Self::Suspended => "SUSPENDED",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(value))
    }
}

/// Nullable owner references shared by status and error records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owners {
    pub experiment_id: Option<String>,
    pub node_instance_id: Option<String>,
    pub task_id: Option<String>,
    pub job_id: Option<String>,
    pub transfer_id: Option<String>,
}

impl Owners {
    /// Set owner columns as `(column, id)` pairs, most specific last.
    pub fn present(&self) -> Vec<(&'static str, &str)> {
        [
            (owner::EXPERIMENT_ID, &self.experiment_id),
            (owner::NODE_INSTANCE_ID, &self.node_instance_id),
            (owner::TASK_ID, &self.task_id),
            (owner::JOB_ID, &self.job_id),
            (owner::TRANSFER_ID, &self.transfer_id),
        ]
        .into_iter()
        .filter_map(|(column, id)| id.as_deref().map(|id| (column, id)))
        .filter(|(_, id)| !id.trim().is_empty())
        .collect()
    }

    fn extend_row(&self, row: &mut Vec<(&'static str, Value)>) {
        row.extend([
            (owner::EXPERIMENT_ID, opt_text(&self.experiment_id)),
            (owner::NODE_INSTANCE_ID, opt_text(&self.node_instance_id)),
            (owner::TASK_ID, opt_text(&self.task_id)),
            (owner::JOB_ID, opt_text(&self.job_id)),
            (owner::TRANSFER_ID, opt_text(&self.transfer_id)),
        ]);
    }

    fn read(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            experiment_id: record.opt_text(owner::EXPERIMENT_ID)?,
            node_instance_id: record.opt_text(owner::NODE_INSTANCE_ID)?,
            task_id: record.opt_text(owner::TASK_ID)?,
            job_id: record.opt_text(owner::JOB_ID)?,
            transfer_id: record.opt_text(owner::TRANSFER_ID)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub status_id: String,
    #[serde(flatten)]
    pub owners: Owners,
    pub state: Option<String>,
    pub status_update_time: i64,
    pub status_type: StatusType,
}

impl Entity for Status {
    const KIND: ResourceType = ResourceType::Status;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        let mut row = vec![(s::STATUS_ID, text(&self.status_id))];
        self.owners.extend_row(&mut row);
        row.extend([
            (s::STATE, opt_text(&self.state)),
            (s::STATUS_UPDATE_TIME, int(self.status_update_time)),
            (s::STATUS_TYPE, text(self.status_type.as_str())),
        ]);
        row
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        let raw_type = record.text(s::STATUS_TYPE)?;
        let status_type = StatusType::parse(&raw_type).ok_or(RecordError {
            column: s::STATUS_TYPE.to_string(),
            message: "unknown status type",
        })?;

        Ok(Self {
            status_id: record.text(s::STATUS_ID)?,
            owners: Owners::read(record)?,
            state: record.opt_text(s::STATE)?,
            status_update_time: record.int(s::STATUS_UPDATE_TIME)?,
            status_type,
        })
    }

    fn blank() -> Self {
        Self {
            status_id: new_id(),
            status_update_time: now_millis(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub error_id: String,
    #[serde(flatten)]
    pub owners: Owners,
    pub creation_time: i64,
    pub actual_error_message: Option<String>,
    pub user_friendly_message: Option<String>,
    pub transient_or_persistent: bool,
    pub error_category: Option<String>,
    pub corrective_action: Option<String>,
    pub actionable_group: Option<String>,
}

impl Entity for ErrorDetail {
    const KIND: ResourceType = ResourceType::ErrorDetail;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        let mut row = vec![(ed::ERROR_ID, text(&self.error_id))];
        self.owners.extend_row(&mut row);
        row.extend([
            (ed::CREATION_TIME, int(self.creation_time)),
            (ed::ACTUAL_ERROR_MESSAGE, opt_text(&self.actual_error_message)),
            (
                ed::USER_FRIENDLY_MESSAGE,
                opt_text(&self.user_friendly_message),
            ),
            (
                ed::TRANSIENT_OR_PERSISTENT,
                flag(self.transient_or_persistent),
            ),
            (ed::ERROR_CATEGORY, opt_text(&self.error_category)),
            (ed::CORRECTIVE_ACTION, opt_text(&self.corrective_action)),
            (ed::ACTIONABLE_GROUP, opt_text(&self.actionable_group)),
        ]);
        row
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            error_id: record.text(ed::ERROR_ID)?,
            owners: Owners::read(record)?,
            creation_time: record.int(ed::CREATION_TIME)?,
            actual_error_message: record.opt_text(ed::ACTUAL_ERROR_MESSAGE)?,
            user_friendly_message: record.opt_text(ed::USER_FRIENDLY_MESSAGE)?,
            transient_or_persistent: record.bool(ed::TRANSIENT_OR_PERSISTENT)?,
            error_category: record.opt_text(ed::ERROR_CATEGORY)?,
            corrective_action: record.opt_text(ed::CORRECTIVE_ACTION)?,
            actionable_group: record.opt_text(ed::ACTIONABLE_GROUP)?,
        })
    }

    fn blank() -> Self {
        Self {
            error_id: new_id(),
            creation_time: now_millis(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExperimentState, Owners, Status, StatusType};
    use crate::model::Entity;
    use crate::query::Record;

    #[test]
    fn status_type_tags_are_stable() {
        for status_type in [
            StatusType::Experiment,
            StatusType::WorkflowNode,
            StatusType::Task,
            StatusType::Job,
            StatusType::Application,
            StatusType::DataTransfer,
        ] {
            assert_eq!(StatusType::parse(status_type.as_str()), Some(status_type));
        }
        assert_eq!(StatusType::parse("task"), None);
    }

    #[test]
    fn experiment_states_parse_loosely() {
        for state in ExperimentState::ALL {
            assert_eq!(ExperimentState::parse(state.as_str()), Some(state));
        }
        assert_eq!(
            ExperimentState::parse(" executing "),
            Some(ExperimentState::Executing)
        );
        assert_eq!(ExperimentState::parse("RUNNING"), None);
    }

    #[test]
    fn blank_owners_are_not_counted() {
        let owners = Owners {
            task_id: Some("t1".to_string()),
            job_id: Some("  ".to_string()),
            ..Owners::default()
        };
        assert_eq!(owners.present(), vec![("task_id", "t1")]);
    }

    #[test]
    fn unknown_status_type_is_invalid_data() {
        let mut record = Record::from_row(Status::blank().to_row());
        record.set("status_type", rusqlite::types::Value::Text("PAUSED".into()));
        let err = Status::from_record(&record).unwrap_err();
        assert_eq!(err.column, "status_type");
    }
}
