//! Parent→child capability table.
//!
//! # Responsibility
//! - Declare which child kinds each parent kind can create, get, list and
//!   delete.
//! - Describe how a child row is scoped to and wired from its parent.
//!
//! # Invariants
//! - At most one binding per `(parent, child)` pair.
//! - Every scope/inherit/key column exists in the child kind's row.
//! - A pair absent from the table is unsupported for every operation.

use super::ResourceType;
use crate::model::StatusType;
use crate::schema::{
    application_descriptor as ad, data_transfer_detail as dt, error_detail, experiment as e,
    gateway as g, gateway_worker as gw, host_descriptor as hd, input, job_detail as j,
    notification_email as ne, output, owner, project as p, published_workflow as pw,
    service_descriptor as sd, status, task_detail as t, user_workflow as uw, users,
    workflow_node_detail as wn,
};

/// `(child column, parent column)`.
pub type ColumnLink = (&'static str, &'static str);

/// Fixed column value written into new children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discriminator {
    pub column: &'static str,
    pub value: &'static str,
    /// When false the value is only a default and queries ignore it.
    pub filters: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildBinding {
    pub parent: ResourceType,
    pub child: ResourceType,
    /// Filters every child query and is copied into new children.
    pub scope: &'static [ColumnLink],
    /// Copied into new children only.
    pub inherit: &'static [ColumnLink],
    /// Column matched by the `key` argument; `None` for keyless children.
    pub key_column: Option<&'static str>,
    pub discriminator: Option<Discriminator>,
}

const fn bind(
    parent: ResourceType,
    child: ResourceType,
    scope: &'static [ColumnLink],
    key_column: Option<&'static str>,
) -> ChildBinding {
    ChildBinding {
        parent,
        child,
        scope,
        inherit: &[],
        key_column,
        discriminator: None,
    }
}

const fn status_of(
    parent: ResourceType,
    scope: &'static [ColumnLink],
    status_type: StatusType,
    filters: bool,
) -> ChildBinding {
    ChildBinding {
        parent,
        child: ResourceType::Status,
        scope,
        inherit: &[],
        key_column: Some(status::STATUS_ID),
        discriminator: Some(Discriminator {
            column: status::STATUS_TYPE,
            value: status_type.as_str(),
            filters,
        }),
    }
}

use ResourceType::*;

const BY_GATEWAY: &[ColumnLink] = &[(g::GATEWAY_ID, g::GATEWAY_ID)];
const BY_WORKER: &[ColumnLink] = &[(p::GATEWAY_ID, gw::GATEWAY_ID), (p::USER_NAME, gw::USER_NAME)];
const BY_EXPERIMENT: &[ColumnLink] = &[(owner::EXPERIMENT_ID, e::EXPERIMENT_ID)];
const BY_NODE: &[ColumnLink] = &[(owner::NODE_INSTANCE_ID, wn::NODE_INSTANCE_ID)];
const BY_TASK: &[ColumnLink] = &[(owner::TASK_ID, t::TASK_ID)];
const BY_JOB: &[ColumnLink] = &[(owner::JOB_ID, j::JOB_ID)];
const BY_TRANSFER: &[ColumnLink] = &[(owner::TRANSFER_ID, dt::TRANSFER_ID)];

pub static CHILD_BINDINGS: &[ChildBinding] = &[
    // Gateway
    bind(Gateway, Project, BY_GATEWAY, Some(p::PROJECT_ID)),
    bind(Gateway, Experiment, BY_GATEWAY, Some(e::EXPERIMENT_ID)),
    bind(Gateway, GatewayWorker, BY_GATEWAY, Some(gw::USER_NAME)),
    bind(Gateway, User, &[], Some(users::USER_NAME)),
    bind(Gateway, HostDescriptor, BY_GATEWAY, Some(hd::HOST_DESCRIPTOR_ID)),
    bind(Gateway, ServiceDescriptor, BY_GATEWAY, Some(sd::SERVICE_DESCRIPTOR_ID)),
    bind(
        Gateway,
        ApplicationDescriptor,
        BY_GATEWAY,
        Some(ad::APPLICATION_DESCRIPTOR_ID),
    ),
    bind(Gateway, PublishedWorkflow, BY_GATEWAY, Some(pw::PUBLISH_WORKFLOW_NAME)),
    // GatewayWorker
    bind(GatewayWorker, Project, BY_WORKER, Some(p::PROJECT_ID)),
    bind(
        GatewayWorker,
        Experiment,
        &[
            (e::GATEWAY_ID, gw::GATEWAY_ID),
            (e::EXECUTION_USER, gw::USER_NAME),
        ],
        Some(e::EXPERIMENT_ID),
    ),
    bind(
        GatewayWorker,
        UserWorkflow,
        &[(uw::GATEWAY_ID, gw::GATEWAY_ID), (uw::OWNER, gw::USER_NAME)],
        Some(uw::TEMPLATE_NAME),
    ),
    // Project
    ChildBinding {
        parent: Project,
        child: Experiment,
        scope: &[(e::PROJECT_ID, p::PROJECT_ID)],
        inherit: &[
            (e::GATEWAY_ID, p::GATEWAY_ID),
            (e::EXECUTION_USER, p::USER_NAME),
        ],
        key_column: Some(e::EXPERIMENT_ID),
        discriminator: None,
    },
    ChildBinding {
        parent: Project,
        child: UserWorkflow,
        scope: &[(uw::PROJECT_ID, p::PROJECT_ID)],
        inherit: &[(uw::GATEWAY_ID, p::GATEWAY_ID), (uw::OWNER, p::USER_NAME)],
        key_column: Some(uw::TEMPLATE_NAME),
        discriminator: None,
    },
    // Experiment
    bind(Experiment, ExperimentInput, BY_EXPERIMENT, Some(input::INPUT_KEY)),
    bind(Experiment, ExperimentOutput, BY_EXPERIMENT, Some(output::OUTPUT_KEY)),
    bind(Experiment, ConfigData, BY_EXPERIMENT, None),
    bind(Experiment, WorkflowNodeDetail, BY_EXPERIMENT, Some(wn::NODE_INSTANCE_ID)),
    status_of(Experiment, BY_EXPERIMENT, StatusType::Experiment, true),
    bind(Experiment, ErrorDetail, BY_EXPERIMENT, Some(error_detail::ERROR_ID)),
    bind(Experiment, ComputationalResourceScheduling, BY_EXPERIMENT, None),
    bind(Experiment, AdvancedInputDataHandling, BY_EXPERIMENT, None),
    bind(Experiment, AdvancedOutputDataHandling, BY_EXPERIMENT, None),
    bind(Experiment, QosParam, BY_EXPERIMENT, None),
    bind(Experiment, NotificationEmail, BY_EXPERIMENT, Some(ne::EMAIL_ADDRESS)),
    // WorkflowNodeDetail
    bind(WorkflowNodeDetail, TaskDetail, BY_NODE, Some(t::TASK_ID)),
    bind(WorkflowNodeDetail, NodeInput, BY_NODE, Some(input::INPUT_KEY)),
    bind(WorkflowNodeDetail, NodeOutput, BY_NODE, Some(output::OUTPUT_KEY)),
    bind(WorkflowNodeDetail, ErrorDetail, BY_NODE, Some(error_detail::ERROR_ID)),
    status_of(WorkflowNodeDetail, BY_NODE, StatusType::WorkflowNode, true),
    // TaskDetail
    bind(TaskDetail, JobDetail, BY_TASK, Some(j::JOB_ID)),
    bind(TaskDetail, DataTransferDetail, BY_TASK, Some(dt::TRANSFER_ID)),
    bind(TaskDetail, ApplicationInput, BY_TASK, Some(input::INPUT_KEY)),
    bind(TaskDetail, ApplicationOutput, BY_TASK, Some(output::OUTPUT_KEY)),
    bind(TaskDetail, NotificationEmail, BY_TASK, Some(ne::EMAIL_ADDRESS)),
    status_of(TaskDetail, BY_TASK, StatusType::Task, true),
    bind(TaskDetail, ErrorDetail, BY_TASK, Some(error_detail::ERROR_ID)),
    bind(TaskDetail, ComputationalResourceScheduling, BY_TASK, None),
    bind(TaskDetail, AdvancedInputDataHandling, BY_TASK, None),
    bind(TaskDetail, AdvancedOutputDataHandling, BY_TASK, None),
    bind(TaskDetail, QosParam, BY_TASK, None),
    // JobDetail: JOB and APPLICATION statuses share the job owner column.
    status_of(JobDetail, BY_JOB, StatusType::Job, false),
    bind(JobDetail, ErrorDetail, BY_JOB, Some(error_detail::ERROR_ID)),
    // DataTransferDetail
    status_of(DataTransferDetail, BY_TRANSFER, StatusType::DataTransfer, true),
    bind(DataTransferDetail, ErrorDetail, BY_TRANSFER, Some(error_detail::ERROR_ID)),
];

/// Looks up the binding for a `(parent, child)` pair.
pub fn binding(parent: ResourceType, child: ResourceType) -> Option<&'static ChildBinding> {
    CHILD_BINDINGS
        .iter()
        .find(|binding| binding.parent == parent && binding.child == child)
}

/// Child kinds a parent kind can hold, in declaration order.
pub fn children_of(parent: ResourceType) -> impl Iterator<Item = ResourceType> {
    CHILD_BINDINGS
        .iter()
        .filter(move |binding| binding.parent == parent)
        .map(|binding| binding.child)
}

#[cfg(test)]
mod tests {
    use super::{binding, children_of, CHILD_BINDINGS};
    use crate::model::StatusType;
    use crate::resource::{EntityData, ResourceType};
    use rusqlite::types::Value;
    use std::collections::HashSet;

    fn has(row: &[(&'static str, Value)], column: &str) -> bool {
        row.iter().any(|(name, _)| *name == column)
    }

    #[test]
    fn pairs_are_unique() {
        let mut seen = HashSet::new();
        for binding in CHILD_BINDINGS {
            assert!(
                seen.insert((binding.parent, binding.child)),
                "duplicate binding {} -> {}",
                binding.parent,
                binding.child
            );
        }
    }

    #[test]
    fn linked_columns_exist_on_both_sides() {
        for binding in CHILD_BINDINGS {
            let child_row = EntityData::blank(binding.child).to_row();
            let parent_row = EntityData::blank(binding.parent).to_row();

            for (child_column, parent_column) in binding.scope.iter().chain(binding.inherit) {
                assert!(has(&child_row, child_column), "{} lacks {child_column}", binding.child);
                assert!(has(&parent_row, parent_column), "{} lacks {parent_column}", binding.parent);
            }
            if let Some(key) = binding.key_column {
                assert!(has(&child_row, key), "{} lacks key {key}", binding.child);
            }
        }
    }

    #[test]
    fn status_tags_match_the_model() {
        let job = binding(ResourceType::JobDetail, ResourceType::Status).unwrap();
        let discriminator = job.discriminator.unwrap();
        assert_eq!(discriminator.value, StatusType::Job.as_str());
        assert!(!discriminator.filters);
    }

    #[test]
    fn leaves_hold_nothing() {
        assert_eq!(children_of(ResourceType::Status).count(), 0);
        assert_eq!(children_of(ResourceType::Configuration).count(), 0);
        assert!(children_of(ResourceType::Gateway).any(|kind| kind == ResourceType::User));
    }
}
