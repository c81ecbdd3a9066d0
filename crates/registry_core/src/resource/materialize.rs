//! Reverse mapping from persisted rows to addressable resources.
//!
//! # Responsibility
//! - Decode a raw record into the typed entity of its kind.
//! - Resolve parent links recursively inside the caller's unit of work.
//!
//! # Invariants
//! - Links whose child columns are NULL or blank are skipped.
//! - A link whose columns are set must resolve to exactly one row.

use super::capability::ColumnLink;
use super::{
    display_value, is_blank, EntityData, RegistryError, RegistryResult, Resource, ResourceType,
};
use crate::query::{QueryBuilder, Record};
use crate::schema::{
    experiment as e, gateway as g, gateway_worker as gw, owner, project as p, users,
    user_workflow as uw,
};
use rusqlite::Connection;

/// How a child row points at one of its parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    pub kind: ResourceType,
    /// `(child column, parent column)` pairs.
    pub columns: &'static [ColumnLink],
}

const TO_GATEWAY: ParentLink = ParentLink {
    kind: ResourceType::Gateway,
    columns: &[(g::GATEWAY_ID, g::GATEWAY_ID)],
};
const TO_EXPERIMENT: ParentLink = ParentLink {
    kind: ResourceType::Experiment,
    columns: &[(owner::EXPERIMENT_ID, e::EXPERIMENT_ID)],
};
const TO_NODE: ParentLink = ParentLink {
    kind: ResourceType::WorkflowNodeDetail,
    columns: &[(owner::NODE_INSTANCE_ID, owner::NODE_INSTANCE_ID)],
};
const TO_TASK: ParentLink = ParentLink {
    kind: ResourceType::TaskDetail,
    columns: &[(owner::TASK_ID, owner::TASK_ID)],
};
const TO_JOB: ParentLink = ParentLink {
    kind: ResourceType::JobDetail,
    columns: &[(owner::JOB_ID, owner::JOB_ID)],
};
const TO_TRANSFER: ParentLink = ParentLink {
    kind: ResourceType::DataTransferDetail,
    columns: &[(owner::TRANSFER_ID, owner::TRANSFER_ID)],
};

const WORKER_LINKS: &[ParentLink] = &[
    TO_GATEWAY,
    ParentLink {
        kind: ResourceType::User,
        columns: &[(gw::USER_NAME, users::USER_NAME)],
    },
];
const PROJECT_LINKS: &[ParentLink] = &[ParentLink {
    kind: ResourceType::GatewayWorker,
    columns: &[
        (p::GATEWAY_ID, gw::GATEWAY_ID),
        (p::USER_NAME, gw::USER_NAME),
    ],
}];
const EXPERIMENT_LINKS: &[ParentLink] = &[
    TO_GATEWAY,
    ParentLink {
        kind: ResourceType::GatewayWorker,
        columns: &[
            (e::GATEWAY_ID, gw::GATEWAY_ID),
            (e::EXECUTION_USER, gw::USER_NAME),
        ],
    },
    ParentLink {
        kind: ResourceType::Project,
        columns: &[(e::PROJECT_ID, p::PROJECT_ID)],
    },
];
const USER_WORKFLOW_LINKS: &[ParentLink] = &[
    ParentLink {
        kind: ResourceType::GatewayWorker,
        columns: &[(uw::GATEWAY_ID, gw::GATEWAY_ID), (uw::OWNER, gw::USER_NAME)],
    },
    ParentLink {
        kind: ResourceType::Project,
        columns: &[(uw::PROJECT_ID, p::PROJECT_ID)],
    },
];
const EXPERIMENT_ONLY: &[ParentLink] = &[TO_EXPERIMENT];
const NODE_ONLY: &[ParentLink] = &[TO_NODE];
const TASK_ONLY: &[ParentLink] = &[TO_TASK];
const GATEWAY_ONLY: &[ParentLink] = &[TO_GATEWAY];
const EXPERIMENT_OR_TASK: &[ParentLink] = &[TO_EXPERIMENT, TO_TASK];
const ANY_OWNER: &[ParentLink] = &[TO_EXPERIMENT, TO_NODE, TO_TASK, TO_JOB, TO_TRANSFER];

/// Parent links of `kind`, most general first.
pub fn parent_links(kind: ResourceType) -> &'static [ParentLink] {
    use ResourceType::*;

    match kind {
        Gateway | User | Configuration => &[],
        GatewayWorker => WORKER_LINKS,
        Project => PROJECT_LINKS,
        Experiment => EXPERIMENT_LINKS,
        ExperimentInput | ExperimentOutput | ConfigData | WorkflowNodeDetail => EXPERIMENT_ONLY,
        NodeInput | NodeOutput | TaskDetail => NODE_ONLY,
        ApplicationInput | ApplicationOutput | JobDetail | DataTransferDetail => TASK_ONLY,
        Status | ErrorDetail => ANY_OWNER,
        ComputationalResourceScheduling
        | AdvancedInputDataHandling
        | AdvancedOutputDataHandling
        | QosParam
        | NotificationEmail => EXPERIMENT_OR_TASK,
        HostDescriptor | ServiceDescriptor | ApplicationDescriptor | PublishedWorkflow => {
            GATEWAY_ONLY
        }
        UserWorkflow => USER_WORKFLOW_LINKS,
    }
}

/// Converts a persisted row of `kind` into a resource with its parents
/// resolved on `conn`.
pub fn materialize(conn: &Connection, kind: ResourceType, record: &Record) -> RegistryResult<Resource> {
    let data = EntityData::from_record(kind, record)?;
    let row = data.to_row();
    let mut parents = Vec::new();

    'links: for link in parent_links(kind) {
        let mut query = QueryBuilder::new(link.kind.table_def().table);
        let mut key_parts = Vec::with_capacity(link.columns.len());

        for (child_column, parent_column) in link.columns {
            let value = row
                .iter()
                .find(|(column, _)| column == child_column)
                .map(|(_, value)| value.clone());
            match value {
                Some(value) if !is_blank(&value) => {
                    key_parts.push(display_value(&value));
                    query.set_parameter(*parent_column, value);
                }
                _ => continue 'links,
            }
        }

        let key = key_parts.join("/");
        let mut records = query.select_query().fetch(conn)?;
        let parent_record = match records.len() {
            1 => records.remove(0),
            0 => {
                return Err(RegistryError::NotFound {
                    kind: link.kind,
                    key,
                })
            }
            matches => {
                return Err(RegistryError::AmbiguousResult {
                    kind: link.kind,
                    key,
                    matches,
                })
            }
        };
        parents.push(materialize(conn, link.kind, &parent_record)?);
    }

    Ok(Resource::with_parents(data, parents))
}

#[cfg(test)]
mod tests {
    use super::{parent_links, ANY_OWNER};
    use crate::resource::{EntityData, ResourceType};

    #[test]
    fn link_columns_exist_on_both_sides() {
        for kind in ResourceType::ALL {
            let child_row = EntityData::blank(kind).to_row();
            for link in parent_links(kind) {
                let parent_row = EntityData::blank(link.kind).to_row();
                for (child_column, parent_column) in link.columns {
                    assert!(child_row.iter().any(|(name, _)| name == child_column));
                    assert!(parent_row.iter().any(|(name, _)| name == parent_column));
                }
            }
        }
    }

    #[test]
    fn roots_have_no_links() {
        assert!(parent_links(ResourceType::Gateway).is_empty());
        assert_eq!(parent_links(ResourceType::Status), ANY_OWNER);
    }
}
