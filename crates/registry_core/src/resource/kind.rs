//! Closed enumeration of entity kinds and their table descriptors.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Gateway,
    User,
    GatewayWorker,
    Project,
    Experiment,
    ExperimentInput,
    ExperimentOutput,
    ConfigData,
    WorkflowNodeDetail,
    NodeInput,
    NodeOutput,
    TaskDetail,
    ApplicationInput,
    ApplicationOutput,
    JobDetail,
    DataTransferDetail,
    Status,
    ErrorDetail,
    ComputationalResourceScheduling,
    AdvancedInputDataHandling,
    AdvancedOutputDataHandling,
    QosParam,
    NotificationEmail,
    HostDescriptor,
    ServiceDescriptor,
    ApplicationDescriptor,
    PublishedWorkflow,
    UserWorkflow,
    Configuration,
}

/// Physical table and primary key columns of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub table: &'static str,
    pub key_columns: &'static [&'static str],
}

impl TableDef {
    pub fn is_key_column(&self, column: &str) -> bool {
        self.key_columns.contains(&column)
    }
}

impl ResourceType {
    pub const ALL: [ResourceType; 29] = [
        Self::Gateway,
        Self::User,
        Self::GatewayWorker,
        Self::Project,
        Self::Experiment,
        Self::ExperimentInput,
        Self::ExperimentOutput,
        Self::ConfigData,
        Self::WorkflowNodeDetail,
        Self::NodeInput,
        Self::NodeOutput,
        Self::TaskDetail,
        Self::ApplicationInput,
        Self::ApplicationOutput,
        Self::JobDetail,
        Self::DataTransferDetail,
        Self::Status,
        Self::ErrorDetail,
        Self::ComputationalResourceScheduling,
        Self::AdvancedInputDataHandling,
        Self::AdvancedOutputDataHandling,
        Self::QosParam,
        Self::NotificationEmail,
        Self::HostDescriptor,
        Self::ServiceDescriptor,
        Self::ApplicationDescriptor,
        Self::PublishedWorkflow,
        Self::UserWorkflow,
        Self::Configuration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::User => "user",
            Self::GatewayWorker => "gateway_worker",
            Self::Project => "project",
            Self::Experiment => "experiment",
            Self::ExperimentInput => "experiment_input",
            Self::ExperimentOutput => "experiment_output",
            Self::ConfigData => "config_data",
            Self::WorkflowNodeDetail => "workflow_node_detail",
            Self::NodeInput => "node_input",
            Self::NodeOutput => "node_output",
            Self::TaskDetail => "task_detail",
            Self::ApplicationInput => "application_input",
            Self::ApplicationOutput => "application_output",
            Self::JobDetail => "job_detail",
            Self::DataTransferDetail => "data_transfer_detail",
            Self::Status => "status",
            Self::ErrorDetail => "error_detail",
            Self::ComputationalResourceScheduling => "computational_resource_scheduling",
            Self::AdvancedInputDataHandling => "advanced_input_data_handling",
            Self::AdvancedOutputDataHandling => "advanced_output_data_handling",
            Self::QosParam => "qos_param",
            Self::NotificationEmail => "notification_email",
            Self::HostDescriptor => "host_descriptor",
            Self::ServiceDescriptor => "service_descriptor",
            Self::ApplicationDescriptor => "application_descriptor",
            Self::PublishedWorkflow => "published_workflow",
            Self::UserWorkflow => "user_workflow",
            Self::Configuration => "configuration",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    pub fn table_def(self) -> TableDef {
        use crate::schema::*;

        let (table, key_columns): (&'static str, &'static [&'static str]) = match self {
            Self::Gateway => (gateway::TABLE, &[gateway::GATEWAY_ID]),
            Self::User => (users::TABLE, &[users::USER_NAME]),
            Self::GatewayWorker => (
                gateway_worker::TABLE,
                &[gateway_worker::GATEWAY_ID, gateway_worker::USER_NAME],
            ),
            Self::Project => (project::TABLE, &[project::PROJECT_ID]),
            Self::Experiment => (experiment::TABLE, &[experiment::EXPERIMENT_ID]),
            Self::ExperimentInput => (
                experiment_input::TABLE,
                &[experiment_input::EXPERIMENT_ID, input::INPUT_KEY],
            ),
            Self::ExperimentOutput => (
                experiment_output::TABLE,
                &[experiment_output::EXPERIMENT_ID, output::OUTPUT_KEY],
            ),
            Self::ConfigData => (config_data::TABLE, &[config_data::EXPERIMENT_ID]),
            Self::WorkflowNodeDetail => (
                workflow_node_detail::TABLE,
                &[workflow_node_detail::NODE_INSTANCE_ID],
            ),
            Self::NodeInput => (
                node_input::TABLE,
                &[node_input::NODE_INSTANCE_ID, input::INPUT_KEY],
            ),
            Self::NodeOutput => (
                node_output::TABLE,
                &[node_output::NODE_INSTANCE_ID, output::OUTPUT_KEY],
            ),
            Self::TaskDetail => (task_detail::TABLE, &[task_detail::TASK_ID]),
            Self::ApplicationInput => (
                application_input::TABLE,
                &[application_input::TASK_ID, input::INPUT_KEY],
            ),
            Self::ApplicationOutput => (
                application_output::TABLE,
                &[application_output::TASK_ID, output::OUTPUT_KEY],
            ),
            Self::JobDetail => (job_detail::TABLE, &[job_detail::JOB_ID]),
            Self::DataTransferDetail => (
                data_transfer_detail::TABLE,
                &[data_transfer_detail::TRANSFER_ID],
            ),
            Self::Status => (status::TABLE, &[status::STATUS_ID]),
            Self::ErrorDetail => (error_detail::TABLE, &[error_detail::ERROR_ID]),
            Self::ComputationalResourceScheduling => (
                resource_scheduling::TABLE,
                &[resource_scheduling::SCHEDULING_ID],
            ),
            Self::AdvancedInputDataHandling => (
                input_data_handling::TABLE,
                &[input_data_handling::DATA_HANDLING_ID],
            ),
            Self::AdvancedOutputDataHandling => (
                output_data_handling::TABLE,
                &[output_data_handling::OUTPUT_DATA_HANDLING_ID],
            ),
            Self::QosParam => (qos_params::TABLE, &[qos_params::QOS_ID]),
            Self::NotificationEmail => (notification_email::TABLE, &[notification_email::EMAIL_ID]),
            Self::HostDescriptor => (
                host_descriptor::TABLE,
                &[host_descriptor::GATEWAY_ID, host_descriptor::HOST_DESCRIPTOR_ID],
            ),
            Self::ServiceDescriptor => (
                service_descriptor::TABLE,
                &[
                    service_descriptor::GATEWAY_ID,
                    service_descriptor::SERVICE_DESCRIPTOR_ID,
                ],
            ),
            Self::ApplicationDescriptor => (
                application_descriptor::TABLE,
                &[
                    application_descriptor::GATEWAY_ID,
                    application_descriptor::APPLICATION_DESCRIPTOR_ID,
                ],
            ),
            Self::PublishedWorkflow => (
                published_workflow::TABLE,
                &[
                    published_workflow::GATEWAY_ID,
                    published_workflow::PUBLISH_WORKFLOW_NAME,
                ],
            ),
            Self::UserWorkflow => (
                user_workflow::TABLE,
                &[
                    user_workflow::GATEWAY_ID,
                    user_workflow::OWNER,
                    user_workflow::TEMPLATE_NAME,
                ],
            ),
            Self::Configuration => (
                configuration::TABLE,
                &[configuration::CONFIG_KEY, configuration::CONFIG_VAL],
            ),
        };

        TableDef { table, key_columns }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceType;
    use std::collections::HashSet;

    #[test]
    fn tags_round_trip_and_are_unique() {
        let mut seen = HashSet::new();
        for kind in ResourceType::ALL {
            assert!(seen.insert(kind.as_str()));
            assert_eq!(ResourceType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ResourceType::parse("Gateway"), None);
    }

    #[test]
    fn every_kind_has_a_keyed_table() {
        let mut tables = HashSet::new();
        for kind in ResourceType::ALL {
            let def = kind.table_def();
            assert!(!def.key_columns.is_empty(), "{kind} has no key");
            assert!(tables.insert(def.table), "{kind} shares a table");
        }
    }
}
