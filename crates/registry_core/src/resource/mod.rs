//! Generic resource tree over the registry schema.
//!
//! # Responsibility
//! - Provide one polymorphic node contract (`ResourceNode`) for every kind.
//! - Route child operations through the capability table instead of
//!   per-kind code.
//! - Map persisted rows back to fully addressable resources.
//!
//! # Invariants
//! - A `Resource` is a transient projection; nothing is cached across calls.
//! - Every operation runs in its own unit of work (two for two-phase save).
//! - Unsupported parent/child pairs fail with `UnsupportedType`.

use crate::db::Store;
use crate::model::{Status, StatusType};
use log::warn;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

pub mod capability;
mod entity;
mod error;
mod kind;
mod materialize;
mod node;
mod upsert;

pub use capability::{binding, children_of, ChildBinding, ColumnLink, Discriminator};
pub use entity::{EntityCast, EntityData};
pub use error::{RegistryError, RegistryResult};
pub use kind::{ResourceType, TableDef};
pub use materialize::{materialize, parent_links, ParentLink};

/// Uniform operations every resource offers on its children.
pub trait ResourceNode {
    /// New unsaved child wired to this resource.
    fn create(&self, child: ResourceType) -> RegistryResult<Resource>;

    /// Exactly one child matching `key` within this resource's scope.
    fn get(&self, store: &Store, child: ResourceType, key: &str) -> RegistryResult<Resource>;

    /// Every child of `child` kind within this resource's scope.
    fn list(&self, store: &Store, child: ResourceType) -> RegistryResult<Vec<Resource>>;

    /// Removes matching children; removing nothing is not an error.
    fn delete(&self, store: &Store, child: ResourceType, key: &str) -> RegistryResult<()>;

    /// Like `exists`, but storage failures are returned instead of logged.
    fn try_exists(&self, store: &Store, child: ResourceType, key: &str) -> RegistryResult<bool> {
        match self.get(store, child, key) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// `true` iff `get` would succeed. Failures other than not-found are
    /// logged and reported as `false`.
    fn exists(&self, store: &Store, child: ResourceType, key: &str) -> bool {
        match self.try_exists(store, child, key) {
            Ok(found) => found,
            Err(err) => {
                warn!(
                    "event=resource_exists module=resource status=error child={} error={}",
                    child,
                    err
                );
                false
            }
        }
    }

    /// Inserts or merges this resource by primary key.
    fn save(&self, store: &Store) -> RegistryResult<()>;
}

/// One entity plus the chain of resources it hangs off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    data: EntityData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parents: Vec<Resource>,
}

impl Resource {
    pub fn new(data: EntityData) -> Self {
        Self {
            data,
            parents: Vec::new(),
        }
    }

    pub fn from_entity<E: EntityCast>(entity: E) -> Self {
        Self::new(entity.into_data())
    }

    /// Unsaved resource with default fields and no parents.
    pub fn blank(kind: ResourceType) -> Self {
        Self::new(EntityData::blank(kind))
    }

    pub(crate) fn with_parents(data: EntityData, parents: Vec<Resource>) -> Self {
        Self { data, parents }
    }

    pub fn kind(&self) -> ResourceType {
        self.data.kind()
    }

    pub fn data(&self) -> &EntityData {
        &self.data
    }

    pub fn into_data(self) -> EntityData {
        self.data
    }

    pub fn entity<E: EntityCast>(&self) -> RegistryResult<&E> {
        let actual = self.kind();
        E::cast(&self.data).ok_or(RegistryError::KindMismatch {
            expected: E::KIND,
            actual,
        })
    }

    pub fn entity_mut<E: EntityCast>(&mut self) -> RegistryResult<&mut E> {
        let actual = self.kind();
        E::cast_mut(&mut self.data).ok_or(RegistryError::KindMismatch {
            expected: E::KIND,
            actual,
        })
    }

    pub fn into_entity<E: EntityCast>(self) -> RegistryResult<E> {
        self.entity::<E>().cloned()
    }

    pub fn parents(&self) -> &[Resource] {
        &self.parents
    }

    /// Nearest resource of `kind` among this resource's parents, searched
    /// breadth-first.
    pub fn ancestor(&self, kind: ResourceType) -> Option<&Resource> {
        let mut frontier: Vec<&Resource> = self.parents.iter().collect();
        while !frontier.is_empty() {
            if let Some(found) = frontier.iter().find(|parent| parent.kind() == kind) {
                return Some(*found);
            }
            frontier = frontier
                .into_iter()
                .flat_map(|parent| parent.parents.iter())
                .collect();
        }
        None
    }

    /// Current value of `column`, `Null` when the kind has no such column.
    pub fn value(&self, column: &str) -> Value {
        self.data
            .to_row()
            .into_iter()
            .find(|(name, _)| *name == column)
            .map_or(Value::Null, |(_, value)| value)
    }

    /// Primary key columns and values, in table-definition order.
    pub fn key(&self) -> Vec<(&'static str, Value)> {
        let def = self.kind().table_def();
        let row = self.data.to_row();
        def.key_columns
            .iter()
            .map(|column| {
                let value = row
                    .iter()
                    .find(|(name, _)| name == column)
                    .map_or(Value::Null, |(_, value)| value.clone());
                (*column, value)
            })
            .collect()
    }

    /// Primary key rendered for logs and error messages.
    pub fn key_string(&self) -> String {
        self.key()
            .iter()
            .map(|(_, value)| display_value(value))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Most recent status carrying this resource's own status type.
    ///
    /// Job resources report their `JOB` status, not the `APPLICATION` one.
    pub fn own_status(&self, store: &Store) -> RegistryResult<Option<Resource>> {
        let Some(status_type) = own_status_type(self.kind()) else {
            return Err(RegistryError::UnsupportedType {
                parent: self.kind(),
                child: ResourceType::Status,
            });
        };

        let mut latest: Option<(i64, Resource)> = None;
        for resource in self.list(store, ResourceType::Status)? {
            let status = resource.entity::<Status>()?;
            if status.status_type != status_type {
                continue;
            }
            let updated = status.status_update_time;
            if latest.as_ref().map_or(true, |(best, _)| updated >= *best) {
                latest = Some((updated, resource));
            }
        }
        Ok(latest.map(|(_, resource)| resource))
    }
}

fn own_status_type(kind: ResourceType) -> Option<StatusType> {
    match kind {
        ResourceType::Experiment => Some(StatusType::Experiment),
        ResourceType::WorkflowNodeDetail => Some(StatusType::WorkflowNode),
        ResourceType::TaskDetail => Some(StatusType::Task),
        ResourceType::JobDetail => Some(StatusType::Job),
        ResourceType::DataTransferDetail => Some(StatusType::DataTransfer),
        _ => None,
    }
}

pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Integer(number) => number.to_string(),
        Value::Real(number) => number.to_string(),
        Value::Text(text) => text.clone(),
        Value::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}

pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(text) => text.trim().is_empty(),
        _ => false,
    }
}
