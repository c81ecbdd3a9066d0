//! Typed records for every registry entity kind.
//!
//! # Responsibility
//! - Define one plain struct per persisted kind.
//! - Convert between structs and column/value rows named by `crate::schema`.
//!
//! # Invariants
//! - `to_row` emits every column of the kind's table, key columns included.
//! - `from_record(to_row(x)) == x` for every entity.
//! - Timestamps are epoch milliseconds; booleans persist as `0/1`.

use crate::query::{Record, RecordError};
use crate::resource::ResourceType;
use rusqlite::types::Value;
use std::fmt::Debug;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod descriptor;
pub mod experiment;
pub mod gateway;
pub mod io;
pub mod project;
pub mod status;
pub mod task;
pub mod workflow;

pub use descriptor::{
    ApplicationDescriptor, HostDescriptor, PublishedWorkflow, ServiceDescriptor, UserWorkflow,
};
pub use experiment::{ConfigData, Experiment, NotificationEmail};
pub use gateway::{Configuration, Gateway, GatewayWorker, User};
pub use io::{
    ApplicationInput, ApplicationOutput, ExperimentInput, ExperimentOutput, InputFields,
    NodeInput, NodeOutput, OutputFields,
};
pub use project::Project;
pub use status::{ErrorDetail, ExperimentState, Owners, Status, StatusType};
pub use task::{
    AdvancedInputDataHandling, AdvancedOutputDataHandling, ComputationalResourceScheduling,
    DataTransferDetail, JobDetail, QosParam, TaskDetail,
};
pub use workflow::WorkflowNodeDetail;

/// Row mapping shared by every entity kind.
pub trait Entity: Clone + Debug + Default + PartialEq {
    const KIND: ResourceType;

    fn to_row(&self) -> Vec<(&'static str, Value)>;

    fn from_record(record: &Record) -> Result<Self, RecordError>;

    /// Fresh unsaved value; kinds with surrogate ids generate one here.
    fn blank() -> Self {
        Self::default()
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

pub(crate) fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub(crate) fn opt_text(value: &Option<String>) -> Value {
    value
        .as_ref()
        .map_or(Value::Null, |text| Value::Text(text.clone()))
}

pub(crate) fn int(value: i64) -> Value {
    Value::Integer(value)
}

pub(crate) fn flag(value: bool) -> Value {
    Value::Integer(i64::from(value))
}
