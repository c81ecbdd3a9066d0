//! Experiment root record and its per-experiment configuration.

use super::{flag, new_id, now_millis, opt_text, text, Entity};
use crate::query::{Record, RecordError};
use crate::resource::ResourceType;
use crate::schema::{config_data as cd, experiment as e, notification_email as ne, owner};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub experiment_id: String,
    pub gateway_id: String,
    pub project_id: String,
    pub execution_user: String,
    pub experiment_name: Option<String>,
    pub description: Option<String>,
    pub creation_time: i64,
    pub application_id: Option<String>,
    pub application_version: Option<String>,
    pub workflow_template_id: Option<String>,
    pub workflow_template_version: Option<String>,
    pub workflow_execution_id: Option<String>,
    pub enable_email_notifications: bool,
    pub gateway_execution_id: Option<String>,
}

impl Entity for Experiment {
    const KIND: ResourceType = ResourceType::Experiment;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (e::EXPERIMENT_ID, text(&self.experiment_id)),
            (e::GATEWAY_ID, text(&self.gateway_id)),
            (e::PROJECT_ID, text(&self.project_id)),
            (e::EXECUTION_USER, text(&self.execution_user)),
            (e::EXPERIMENT_NAME, opt_text(&self.experiment_name)),
            (e::DESCRIPTION, opt_text(&self.description)),
            (e::CREATION_TIME, Value::Integer(self.creation_time)),
            (e::APPLICATION_ID, opt_text(&self.application_id)),
            (e::APPLICATION_VERSION, opt_text(&self.application_version)),
            (e::WORKFLOW_TEMPLATE_ID, opt_text(&self.workflow_template_id)),
            (
                e::WORKFLOW_TEMPLATE_VERSION,
                opt_text(&self.workflow_template_version),
            ),
            (e::WORKFLOW_EXECUTION_ID, opt_text(&self.workflow_execution_id)),
            (
                e::ENABLE_EMAIL_NOTIFICATIONS,
                flag(self.enable_email_notifications),
            ),
            (e::GATEWAY_EXECUTION_ID, opt_text(&self.gateway_execution_id)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            experiment_id: record.text(e::EXPERIMENT_ID)?,
            gateway_id: record.text(e::GATEWAY_ID)?,
            project_id: record.text(e::PROJECT_ID)?,
            execution_user: record.text(e::EXECUTION_USER)?,
            experiment_name: record.opt_text(e::EXPERIMENT_NAME)?,
            description: record.opt_text(e::DESCRIPTION)?,
            creation_time: record.int(e::CREATION_TIME)?,
            application_id: record.opt_text(e::APPLICATION_ID)?,
            application_version: record.opt_text(e::APPLICATION_VERSION)?,
            workflow_template_id: record.opt_text(e::WORKFLOW_TEMPLATE_ID)?,
            workflow_template_version: record.opt_text(e::WORKFLOW_TEMPLATE_VERSION)?,
            workflow_execution_id: record.opt_text(e::WORKFLOW_EXECUTION_ID)?,
            enable_email_notifications: record.bool(e::ENABLE_EMAIL_NOTIFICATIONS)?,
            gateway_execution_id: record.opt_text(e::GATEWAY_EXECUTION_ID)?,
        })
    }

    fn blank() -> Self {
        Self {
            creation_time: now_millis(),
            ..Self::default()
        }
    }
}

/// Scheduling and sharing switches; at most one per experiment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigData {
    pub experiment_id: String,
    pub airavata_auto_schedule: bool,
    pub override_manual_params: bool,
    pub share_experiment: bool,
    pub user_dn: Option<String>,
    pub generate_cert: bool,
}

impl Entity for ConfigData {
    const KIND: ResourceType = ResourceType::ConfigData;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (cd::EXPERIMENT_ID, text(&self.experiment_id)),
            (cd::AIRAVATA_AUTO_SCHEDULE, flag(self.airavata_auto_schedule)),
            (cd::OVERRIDE_MANUAL_PARAMS, flag(self.override_manual_params)),
            (cd::SHARE_EXPERIMENT, flag(self.share_experiment)),
            (cd::USER_DN, opt_text(&self.user_dn)),
            (cd::GENERATE_CERT, flag(self.generate_cert)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            experiment_id: record.text(cd::EXPERIMENT_ID)?,
            airavata_auto_schedule: record.bool(cd::AIRAVATA_AUTO_SCHEDULE)?,
            override_manual_params: record.bool(cd::OVERRIDE_MANUAL_PARAMS)?,
            share_experiment: record.bool(cd::SHARE_EXPERIMENT)?,
            user_dn: record.opt_text(cd::USER_DN)?,
            generate_cert: record.bool(cd::GENERATE_CERT)?,
        })
    }
}

/// Address notified about an experiment or task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEmail {
    pub email_id: String,
    pub experiment_id: Option<String>,
    pub task_id: Option<String>,
    pub email_address: String,
}

impl Entity for NotificationEmail {
    const KIND: ResourceType = ResourceType::NotificationEmail;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (ne::EMAIL_ID, text(&self.email_id)),
            (owner::EXPERIMENT_ID, opt_text(&self.experiment_id)),
            (owner::TASK_ID, opt_text(&self.task_id)),
            (ne::EMAIL_ADDRESS, text(&self.email_address)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            email_id: record.text(ne::EMAIL_ID)?,
            experiment_id: record.opt_text(owner::EXPERIMENT_ID)?,
            task_id: record.opt_text(owner::TASK_ID)?,
            email_address: record.text(ne::EMAIL_ADDRESS)?,
        })
    }

    fn blank() -> Self {
        Self {
            email_id: new_id(),
            ..Self::default()
        }
    }
}
