use super::{int, now_millis, opt_text, text, Entity};
use crate::query::{Record, RecordError};
use crate::resource::ResourceType;
use crate::schema::project as p;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// A named grouping of experiments owned by one gateway worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub gateway_id: String,
    pub user_name: String,
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub creation_time: i64,
}

impl Entity for Project {
    const KIND: ResourceType = ResourceType::Project;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (p::PROJECT_ID, text(&self.project_id)),
            (p::GATEWAY_ID, text(&self.gateway_id)),
            (p::USER_NAME, text(&self.user_name)),
            (p::PROJECT_NAME, opt_text(&self.project_name)),
            (p::DESCRIPTION, opt_text(&self.description)),
            (p::CREATION_TIME, int(self.creation_time)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            project_id: record.text(p::PROJECT_ID)?,
            gateway_id: record.text(p::GATEWAY_ID)?,
            user_name: record.text(p::USER_NAME)?,
            project_name: record.opt_text(p::PROJECT_NAME)?,
            description: record.opt_text(p::DESCRIPTION)?,
            creation_time: record.int(p::CREATION_TIME)?,
        })
    }

    fn blank() -> Self {
        Self {
            creation_time: now_millis(),
            ..Self::default()
        }
    }
}
