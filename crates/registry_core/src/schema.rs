//! Table and field naming contract.
//!
//! These constants are the wire format between the query builder and the
//! storage boundary: they are used verbatim both as column names and as
//! query parameter names, and must stay in sync with the migrations under
//! `db/migrations`.

pub mod gateway {
    pub const TABLE: &str = "gateway";
    pub const GATEWAY_ID: &str = "gateway_id";
    pub const GATEWAY_NAME: &str = "gateway_name";
    pub const DOMAIN: &str = "domain";
    pub const EMAIL_ADDRESS: &str = "email_address";
}

pub mod users {
    pub const TABLE: &str = "users";
    pub const USER_NAME: &str = "user_name";
    pub const PASSWORD: &str = "password";
}

pub mod gateway_worker {
    pub const TABLE: &str = "gateway_worker";
    pub const GATEWAY_ID: &str = "gateway_id";
    pub const USER_NAME: &str = "user_name";
}

pub mod project {
    pub const TABLE: &str = "project";
    pub const PROJECT_ID: &str = "project_id";
    pub const GATEWAY_ID: &str = "gateway_id";
    pub const USER_NAME: &str = "user_name";
    pub const PROJECT_NAME: &str = "project_name";
    pub const DESCRIPTION: &str = "description";
    pub const CREATION_TIME: &str = "creation_time";
}

pub mod experiment {
    pub const TABLE: &str = "experiment";
    pub const EXPERIMENT_ID: &str = "experiment_id";
    pub const GATEWAY_ID: &str = "gateway_id";
    pub const PROJECT_ID: &str = "project_id";
    pub const EXECUTION_USER: &str = "execution_user";
    pub const EXPERIMENT_NAME: &str = "experiment_name";
    pub const DESCRIPTION: &str = "description";
    pub const CREATION_TIME: &str = "creation_time";
    pub const APPLICATION_ID: &str = "application_id";
    pub const APPLICATION_VERSION: &str = "application_version";
    pub const WORKFLOW_TEMPLATE_ID: &str = "workflow_template_id";
    pub const WORKFLOW_TEMPLATE_VERSION: &str = "workflow_template_version";
    pub const WORKFLOW_EXECUTION_ID: &str = "workflow_execution_id";
    pub const ENABLE_EMAIL_NOTIFICATIONS: &str = "enable_email_notifications";
    pub const GATEWAY_EXECUTION_ID: &str = "gateway_execution_id";
}

/// Columns shared by experiment/node/application input tables.
pub mod input {
    pub const INPUT_KEY: &str = "input_key";
    pub const DATA_TYPE: &str = "data_type";
    pub const VALUE: &str = "value";
    pub const METADATA: &str = "metadata";
    pub const APP_ARGUMENT: &str = "app_argument";
    pub const INPUT_ORDER: &str = "input_order";
    pub const STANDARD_INPUT: &str = "standard_input";
    pub const USER_FRIENDLY_DESC: &str = "user_friendly_desc";
    pub const IS_REQUIRED: &str = "is_required";
    pub const REQUIRED_TO_CMD: &str = "required_to_cmd";
    pub const DATA_STAGED: &str = "data_staged";
}

/// Columns shared by experiment/node/application output tables.
pub mod output {
    pub const OUTPUT_KEY: &str = "output_key";
    pub const DATA_TYPE: &str = "data_type";
    pub const VALUE: &str = "value";
    pub const IS_REQUIRED: &str = "is_required";
    pub const REQUIRED_TO_CMD: &str = "required_to_cmd";
    pub const DATA_MOVEMENT: &str = "data_movement";
    pub const DATA_NAME_LOCATION: &str = "data_name_location";
    pub const SEARCH_QUERY: &str = "search_query";
    pub const APP_ARGUMENT: &str = "app_argument";
}

pub mod experiment_input {
    pub const TABLE: &str = "experiment_input";
    pub const EXPERIMENT_ID: &str = "experiment_id";
}

pub mod experiment_output {
    pub const TABLE: &str = "experiment_output";
    pub const EXPERIMENT_ID: &str = "experiment_id";
}

pub mod config_data {
    pub const TABLE: &str = "experiment_config_data";
    pub const EXPERIMENT_ID: &str = "experiment_id";
    pub const AIRAVATA_AUTO_SCHEDULE: &str = "airavata_auto_schedule";
    pub const OVERRIDE_MANUAL_PARAMS: &str = "override_manual_params";
    pub const SHARE_EXPERIMENT: &str = "share_experiment";
    pub const USER_DN: &str = "user_dn";
    pub const GENERATE_CERT: &str = "generate_cert";
}

pub mod workflow_node_detail {
    pub const TABLE: &str = "workflow_node_detail";
    pub const NODE_INSTANCE_ID: &str = "node_instance_id";
    pub const EXPERIMENT_ID: &str = "experiment_id";
    pub const NODE_NAME: &str = "node_name";
    pub const EXECUTION_UNIT: &str = "execution_unit";
    pub const EXECUTION_UNIT_DATA: &str = "execution_unit_data";
    pub const CREATION_TIME: &str = "creation_time";
}

pub mod node_input {
    pub const TABLE: &str = "node_input";
    pub const NODE_INSTANCE_ID: &str = "node_instance_id";
}

pub mod node_output {
    pub const TABLE: &str = "node_output";
    pub const NODE_INSTANCE_ID: &str = "node_instance_id";
}

pub mod task_detail {
    pub const TABLE: &str = "task_detail";
    pub const TASK_ID: &str = "task_id";
    pub const NODE_INSTANCE_ID: &str = "node_instance_id";
    pub const CREATION_TIME: &str = "creation_time";
    pub const APPLICATION_ID: &str = "application_id";
    pub const APPLICATION_VERSION: &str = "application_version";
    pub const APPLICATION_DEPLOYMENT_ID: &str = "application_deployment_id";
    pub const ENABLE_EMAIL_NOTIFICATIONS: &str = "enable_email_notifications";
}

pub mod application_input {
    pub const TABLE: &str = "application_input";
    pub const TASK_ID: &str = "task_id";
}

pub mod application_output {
    pub const TABLE: &str = "application_output";
    pub const TASK_ID: &str = "task_id";
}

pub mod job_detail {
    pub const TABLE: &str = "job_detail";
    pub const JOB_ID: &str = "job_id";
    pub const TASK_ID: &str = "task_id";
    pub const JOB_DESCRIPTION: &str = "job_description";
    pub const CREATION_TIME: &str = "creation_time";
    pub const COMPUTE_RESOURCE_CONSUMED: &str = "compute_resource_consumed";
    pub const JOB_NAME: &str = "job_name";
    pub const WORKING_DIR: &str = "working_dir";
}

pub mod data_transfer_detail {
    pub const TABLE: &str = "data_transfer_detail";
    pub const TRANSFER_ID: &str = "transfer_id";
    pub const TASK_ID: &str = "task_id";
    pub const CREATION_TIME: &str = "creation_time";
    pub const TRANSFER_DESCRIPTION: &str = "transfer_description";
}

/// Owner columns shared by records attachable to several parents.
pub mod owner {
    pub const EXPERIMENT_ID: &str = "experiment_id";
    pub const NODE_INSTANCE_ID: &str = "node_instance_id";
    pub const TASK_ID: &str = "task_id";
    pub const JOB_ID: &str = "job_id";
    pub const TRANSFER_ID: &str = "transfer_id";
}

pub mod status {
    pub const TABLE: &str = "status";
    pub const STATUS_ID: &str = "status_id";
    pub const STATE: &str = "state";
    pub const STATUS_UPDATE_TIME: &str = "status_update_time";
    pub const STATUS_TYPE: &str = "status_type";
}

pub mod error_detail {
    pub const TABLE: &str = "error_detail";
    pub const ERROR_ID: &str = "error_id";
    pub const CREATION_TIME: &str = "creation_time";
    pub const ACTUAL_ERROR_MESSAGE: &str = "actual_error_message";
    pub const USER_FRIENDLY_MESSAGE: &str = "user_friendly_message";
    pub const TRANSIENT_OR_PERSISTENT: &str = "transient_or_persistent";
    pub const ERROR_CATEGORY: &str = "error_category";
    pub const CORRECTIVE_ACTION: &str = "corrective_action";
    pub const ACTIONABLE_GROUP: &str = "actionable_group";
}

pub mod resource_scheduling {
    pub const TABLE: &str = "computational_resource_scheduling";
    pub const SCHEDULING_ID: &str = "scheduling_id";
    pub const RESOURCE_HOST_ID: &str = "resource_host_id";
    pub const CPU_COUNT: &str = "cpu_count";
    pub const NODE_COUNT: &str = "node_count";
    pub const NUMBER_OF_THREADS: &str = "number_of_threads";
    pub const QUEUE_NAME: &str = "queue_name";
    pub const WALL_TIME_LIMIT: &str = "wall_time_limit";
    pub const JOB_START_TIME: &str = "job_start_time";
    pub const TOTAL_PHYSICAL_MEMORY: &str = "total_physical_memory";
    pub const PROJECT_NAME: &str = "project_name";
    pub const CHASSIS_NAME: &str = "chassis_name";
}

pub mod input_data_handling {
    pub const TABLE: &str = "advanced_input_data_handling";
    pub const DATA_HANDLING_ID: &str = "data_handling_id";
    pub const PARENT_WORKING_DIR: &str = "parent_working_dir";
    pub const WORKING_DIR: &str = "working_dir";
    pub const STAGE_INPUTS_TO_WORKING_DIR: &str = "stage_inputs_to_working_dir";
    pub const CLEAN_AFTER_JOB: &str = "clean_after_job";
}

pub mod output_data_handling {
    pub const TABLE: &str = "advanced_output_data_handling";
    pub const OUTPUT_DATA_HANDLING_ID: &str = "output_data_handling_id";
    pub const OUTPUT_DATA_DIR: &str = "output_data_dir";
    pub const DATA_REG_URL: &str = "data_reg_url";
    pub const PERSIST_OUTPUT_DATA: &str = "persist_output_data";
}

pub mod qos_params {
    pub const TABLE: &str = "qos_params";
    pub const QOS_ID: &str = "qos_id";
    pub const START_EXECUTION_AT: &str = "start_execution_at";
    pub const EXECUTE_BEFORE: &str = "execute_before";
    pub const NO_OF_RETRIES: &str = "no_of_retries";
}

pub mod notification_email {
    pub const TABLE: &str = "notification_email";
    pub const EMAIL_ID: &str = "email_id";
    pub const EMAIL_ADDRESS: &str = "email_address";
}

pub mod host_descriptor {
    pub const TABLE: &str = "host_descriptor";
    pub const GATEWAY_ID: &str = "gateway_id";
    pub const HOST_DESCRIPTOR_ID: &str = "host_descriptor_id";
    pub const UPDATED_USER: &str = "updated_user";
    pub const HOST_DESCRIPTOR_XML: &str = "host_descriptor_xml";
}

pub mod service_descriptor {
    pub const TABLE: &str = "service_descriptor";
    pub const GATEWAY_ID: &str = "gateway_id";
    pub const SERVICE_DESCRIPTOR_ID: &str = "service_descriptor_id";
    pub const UPDATED_USER: &str = "updated_user";
    pub const SERVICE_DESCRIPTOR_XML: &str = "service_descriptor_xml";
}

pub mod application_descriptor {
    pub const TABLE: &str = "application_descriptor";
    pub const GATEWAY_ID: &str = "gateway_id";
    pub const APPLICATION_DESCRIPTOR_ID: &str = "application_descriptor_id";
    pub const HOST_DESCRIPTOR_ID: &str = "host_descriptor_id";
    pub const SERVICE_DESCRIPTOR_ID: &str = "service_descriptor_id";
    pub const UPDATED_USER: &str = "updated_user";
    pub const APPLICATION_DESCRIPTOR_XML: &str = "application_descriptor_xml";
}

pub mod published_workflow {
    pub const TABLE: &str = "published_workflow";
    pub const GATEWAY_ID: &str = "gateway_id";
    pub const PUBLISH_WORKFLOW_NAME: &str = "publish_workflow_name";
    pub const VERSION: &str = "version";
    pub const PUBLISHED_DATE: &str = "published_date";
    pub const PATH: &str = "path";
    pub const WORKFLOW_CONTENT: &str = "workflow_content";
    pub const CREATED_USER: &str = "created_user";
}

pub mod user_workflow {
    pub const TABLE: &str = "user_workflow";
    pub const GATEWAY_ID: &str = "gateway_id";
    pub const OWNER: &str = "owner";
    pub const TEMPLATE_NAME: &str = "template_name";
    pub const PROJECT_ID: &str = "project_id";
    pub const PATH: &str = "path";
    pub const WORKFLOW_GRAPH: &str = "workflow_graph";
    pub const LAST_UPDATED_TIME: &str = "last_updated_time";
}

pub mod configuration {
    pub const TABLE: &str = "configuration";
    pub const CONFIG_KEY: &str = "config_key";
    pub const CONFIG_VAL: &str = "config_val";
    pub const EXPIRE_DATE: &str = "expire_date";
    pub const CATEGORY_ID: &str = "category_id";
}
