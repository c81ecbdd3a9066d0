//! Task-level records: tasks, the jobs and transfers they spawn, and the
//! scheduling/data-handling/QoS settings shared with experiments.

use super::{flag, int, new_id, now_millis, opt_text, text, Entity};
use crate::query::{Record, RecordError};
use crate::resource::ResourceType;
use crate::schema::{
    data_transfer_detail as dt, input_data_handling as idh, job_detail as j,
    output_data_handling as odh, owner, qos_params as q, resource_scheduling as rs,
    task_detail as t,
};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetail {
    pub task_id: String,
    pub node_instance_id: String,
    pub creation_time: i64,
    pub application_id: Option<String>,
    pub application_version: Option<String>,
    pub application_deployment_id: Option<String>,
    pub enable_email_notifications: bool,
}

impl Entity for TaskDetail {
    const KIND: ResourceType = ResourceType::TaskDetail;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (t::TASK_ID, text(&self.task_id)),
            (t::NODE_INSTANCE_ID, text(&self.node_instance_id)),
            (t::CREATION_TIME, int(self.creation_time)),
            (t::APPLICATION_ID, opt_text(&self.application_id)),
            (t::APPLICATION_VERSION, opt_text(&self.application_version)),
            (
                t::APPLICATION_DEPLOYMENT_ID,
                opt_text(&self.application_deployment_id),
            ),
            (
                t::ENABLE_EMAIL_NOTIFICATIONS,
                flag(self.enable_email_notifications),
            ),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            task_id: record.text(t::TASK_ID)?,
            node_instance_id: record.text(t::NODE_INSTANCE_ID)?,
            creation_time: record.int(t::CREATION_TIME)?,
            application_id: record.opt_text(t::APPLICATION_ID)?,
            application_version: record.opt_text(t::APPLICATION_VERSION)?,
            application_deployment_id: record.opt_text(t::APPLICATION_DEPLOYMENT_ID)?,
            enable_email_notifications: record.bool(t::ENABLE_EMAIL_NOTIFICATIONS)?,
        })
    }

    fn blank() -> Self {
        Self {
            creation_time: now_millis(),
            ..Self::default()
        }
    }
}

/// A batch job submitted to a compute resource on behalf of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetail {
    pub job_id: String,
    pub task_id: String,
    pub job_description: Option<String>,
    pub creation_time: i64,
    pub compute_resource_consumed: Option<String>,
    pub job_name: Option<String>,
    pub working_dir: Option<String>,
}

impl Entity for JobDetail {
    const KIND: ResourceType = ResourceType::JobDetail;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (j::JOB_ID, text(&self.job_id)),
            (j::TASK_ID, text(&self.task_id)),
            (j::JOB_DESCRIPTION, opt_text(&self.job_description)),
            (j::CREATION_TIME, int(self.creation_time)),
            (
                j::COMPUTE_RESOURCE_CONSUMED,
                opt_text(&self.compute_resource_consumed),
            ),
            (j::JOB_NAME, opt_text(&self.job_name)),
            (j::WORKING_DIR, opt_text(&self.working_dir)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            job_id: record.text(j::JOB_ID)?,
            task_id: record.text(j::TASK_ID)?,
            job_description: record.opt_text(j::JOB_DESCRIPTION)?,
            creation_time: record.int(j::CREATION_TIME)?,
            compute_resource_consumed: record.opt_text(j::COMPUTE_RESOURCE_CONSUMED)?,
            job_name: record.opt_text(j::JOB_NAME)?,
            working_dir: record.opt_text(j::WORKING_DIR)?,
        })
    }

    fn blank() -> Self {
        Self {
            creation_time: now_millis(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTransferDetail {
    pub transfer_id: String,
    pub task_id: String,
    pub creation_time: i64,
    pub transfer_description: Option<String>,
}

impl Entity for DataTransferDetail {
    const KIND: ResourceType = ResourceType::DataTransferDetail;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (dt::TRANSFER_ID, text(&self.transfer_id)),
            (dt::TASK_ID, text(&self.task_id)),
            (dt::CREATION_TIME, int(self.creation_time)),
            (dt::TRANSFER_DESCRIPTION, opt_text(&self.transfer_description)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            transfer_id: record.text(dt::TRANSFER_ID)?,
            task_id: record.text(dt::TASK_ID)?,
            creation_time: record.int(dt::CREATION_TIME)?,
            transfer_description: record.opt_text(dt::TRANSFER_DESCRIPTION)?,
        })
    }

    fn blank() -> Self {
        Self {
            creation_time: now_millis(),
            ..Self::default()
        }
    }
}

/// Compute resource request of an experiment or a single task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationalResourceScheduling {
    pub scheduling_id: String,
    pub experiment_id: Option<String>,
    pub task_id: Option<String>,
    pub resource_host_id: Option<String>,
    pub cpu_count: i64,
    pub node_count: i64,
    pub number_of_threads: i64,
    pub queue_name: Option<String>,
    pub wall_time_limit: i64,
    pub job_start_time: i64,
    pub total_physical_memory: i64,
    pub project_name: Option<String>,
    pub chassis_name: Option<String>,
}

impl Entity for ComputationalResourceScheduling {
    const KIND: ResourceType = ResourceType::ComputationalResourceScheduling;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (rs::SCHEDULING_ID, text(&self.scheduling_id)),
            (owner::EXPERIMENT_ID, opt_text(&self.experiment_id)),
            (owner::TASK_ID, opt_text(&self.task_id)),
            (rs::RESOURCE_HOST_ID, opt_text(&self.resource_host_id)),
            (rs::CPU_COUNT, int(self.cpu_count)),
            (rs::NODE_COUNT, int(self.node_count)),
            (rs::NUMBER_OF_THREADS, int(self.number_of_threads)),
            (rs::QUEUE_NAME, opt_text(&self.queue_name)),
            (rs::WALL_TIME_LIMIT, int(self.wall_time_limit)),
            (rs::JOB_START_TIME, int(self.job_start_time)),
            (rs::TOTAL_PHYSICAL_MEMORY, int(self.total_physical_memory)),
            (rs::PROJECT_NAME, opt_text(&self.project_name)),
            (rs::CHASSIS_NAME, opt_text(&self.chassis_name)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            scheduling_id: record.text(rs::SCHEDULING_ID)?,
            experiment_id: record.opt_text(owner::EXPERIMENT_ID)?,
            task_id: record.opt_text(owner::TASK_ID)?,
            resource_host_id: record.opt_text(rs::RESOURCE_HOST_ID)?,
            cpu_count: record.int(rs::CPU_COUNT)?,
            node_count: record.int(rs::NODE_COUNT)?,
            number_of_threads: record.int(rs::NUMBER_OF_THREADS)?,
            queue_name: record.opt_text(rs::QUEUE_NAME)?,
            wall_time_limit: record.int(rs::WALL_TIME_LIMIT)?,
            job_start_time: record.int(rs::JOB_START_TIME)?,
            total_physical_memory: record.int(rs::TOTAL_PHYSICAL_MEMORY)?,
            project_name: record.opt_text(rs::PROJECT_NAME)?,
            chassis_name: record.opt_text(rs::CHASSIS_NAME)?,
        })
    }

    fn blank() -> Self {
        Self {
            scheduling_id: new_id(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedInputDataHandling {
    pub data_handling_id: String,
    pub experiment_id: Option<String>,
    pub task_id: Option<String>,
    pub parent_working_dir: Option<String>,
    pub working_dir: Option<String>,
    pub stage_inputs_to_working_dir: bool,
    pub clean_after_job: bool,
}

impl Entity for AdvancedInputDataHandling {
    const KIND: ResourceType = ResourceType::AdvancedInputDataHandling;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (idh::DATA_HANDLING_ID, text(&self.data_handling_id)),
            (owner::EXPERIMENT_ID, opt_text(&self.experiment_id)),
            (owner::TASK_ID, opt_text(&self.task_id)),
            (idh::PARENT_WORKING_DIR, opt_text(&self.parent_working_dir)),
            (idh::WORKING_DIR, opt_text(&self.working_dir)),
            (
                idh::STAGE_INPUTS_TO_WORKING_DIR,
                flag(self.stage_inputs_to_working_dir),
            ),
            (idh::CLEAN_AFTER_JOB, flag(self.clean_after_job)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            data_handling_id: record.text(idh::DATA_HANDLING_ID)?,
            experiment_id: record.opt_text(owner::EXPERIMENT_ID)?,
            task_id: record.opt_text(owner::TASK_ID)?,
            parent_working_dir: record.opt_text(idh::PARENT_WORKING_DIR)?,
            working_dir: record.opt_text(idh::WORKING_DIR)?,
            stage_inputs_to_working_dir: record.bool(idh::STAGE_INPUTS_TO_WORKING_DIR)?,
            clean_after_job: record.bool(idh::CLEAN_AFTER_JOB)?,
        })
    }

    fn blank() -> Self {
        Self {
            data_handling_id: new_id(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedOutputDataHandling {
    pub output_data_handling_id: String,
    pub experiment_id: Option<String>,
    pub task_id: Option<String>,
    pub output_data_dir: Option<String>,
    pub data_reg_url: Option<String>,
    pub persist_output_data: bool,
}

impl Entity for AdvancedOutputDataHandling {
    const KIND: ResourceType = ResourceType::AdvancedOutputDataHandling;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (
                odh::OUTPUT_DATA_HANDLING_ID,
                text(&self.output_data_handling_id),
            ),
            (owner::EXPERIMENT_ID, opt_text(&self.experiment_id)),
            (owner::TASK_ID, opt_text(&self.task_id)),
            (odh::OUTPUT_DATA_DIR, opt_text(&self.output_data_dir)),
            (odh::DATA_REG_URL, opt_text(&self.data_reg_url)),
            (odh::PERSIST_OUTPUT_DATA, flag(self.persist_output_data)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            output_data_handling_id: record.text(odh::OUTPUT_DATA_HANDLING_ID)?,
            experiment_id: record.opt_text(owner::EXPERIMENT_ID)?,
            task_id: record.opt_text(owner::TASK_ID)?,
            output_data_dir: record.opt_text(odh::OUTPUT_DATA_DIR)?,
            data_reg_url: record.opt_text(odh::DATA_REG_URL)?,
            persist_output_data: record.bool(odh::PERSIST_OUTPUT_DATA)?,
        })
    }

    fn blank() -> Self {
        Self {
            output_data_handling_id: new_id(),
            ..Self::default()
        }
    }
}

/// Quality-of-service window and retry budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosParam {
    pub qos_id: String,
    pub experiment_id: Option<String>,
    pub task_id: Option<String>,
    pub start_execution_at: Option<String>,
    pub execute_before: Option<String>,
    pub no_of_retries: i64,
}

impl Entity for QosParam {
    const KIND: ResourceType = ResourceType::QosParam;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (q::QOS_ID, text(&self.qos_id)),
            (owner::EXPERIMENT_ID, opt_text(&self.experiment_id)),
            (owner::TASK_ID, opt_text(&self.task_id)),
            (q::START_EXECUTION_AT, opt_text(&self.start_execution_at)),
            (q::EXECUTE_BEFORE, opt_text(&self.execute_before)),
            (q::NO_OF_RETRIES, int(self.no_of_retries)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            qos_id: record.text(q::QOS_ID)?,
            experiment_id: record.opt_text(owner::EXPERIMENT_ID)?,
            task_id: record.opt_text(owner::TASK_ID)?,
            start_execution_at: record.opt_text(q::START_EXECUTION_AT)?,
            execute_before: record.opt_text(q::EXECUTE_BEFORE)?,
            no_of_retries: record.int(q::NO_OF_RETRIES)?,
        })
    }

    fn blank() -> Self {
        Self {
            qos_id: new_id(),
            ..Self::default()
        }
    }
}
