use super::{int, now_millis, opt_text, text, Entity};
use crate::query::{Record, RecordError};
use crate::resource::ResourceType;
use crate::schema::workflow_node_detail as w;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// One node of an experiment's executed workflow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNodeDetail {
    pub node_instance_id: String,
    pub experiment_id: String,
    pub node_name: Option<String>,
    pub execution_unit: Option<String>,
    pub execution_unit_data: Option<String>,
    pub creation_time: i64,
}

impl Entity for WorkflowNodeDetail {
    const KIND: ResourceType = ResourceType::WorkflowNodeDetail;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (w::NODE_INSTANCE_ID, text(&self.node_instance_id)),
            (w::EXPERIMENT_ID, text(&self.experiment_id)),
            (w::NODE_NAME, opt_text(&self.node_name)),
            (w::EXECUTION_UNIT, opt_text(&self.execution_unit)),
            (w::EXECUTION_UNIT_DATA, opt_text(&self.execution_unit_data)),
            (w::CREATION_TIME, int(self.creation_time)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            node_instance_id: record.text(w::NODE_INSTANCE_ID)?,
            experiment_id: record.text(w::EXPERIMENT_ID)?,
            node_name: record.opt_text(w::NODE_NAME)?,
            execution_unit: record.opt_text(w::EXECUTION_UNIT)?,
            execution_unit_data: record.opt_text(w::EXECUTION_UNIT_DATA)?,
            creation_time: record.int(w::CREATION_TIME)?,
        })
    }

    fn blank() -> Self {
        Self {
            creation_time: now_millis(),
            ..Self::default()
        }
    }
}
