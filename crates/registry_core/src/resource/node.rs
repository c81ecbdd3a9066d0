//! `ResourceNode` dispatch through the capability table.

use super::capability::{binding, ChildBinding};
use super::materialize::materialize;
use super::upsert;
use super::{
    EntityData, RegistryError, RegistryResult, Resource, ResourceNode, ResourceType,
};
use crate::db::Store;
use crate::query::{QueryBuilder, Record};
use log::{debug, error};
use rusqlite::types::Value;
use std::time::Instant;

impl Resource {
    fn binding_for(&self, child: ResourceType, op: &str) -> RegistryResult<&'static ChildBinding> {
        binding(self.kind(), child).ok_or_else(|| {
            error!(
                "event=resource_dispatch module=resource status=error op={} parent={} child={} error_code=unsupported_type",
                op,
                self.kind(),
                child
            );
            RegistryError::UnsupportedType {
                parent: self.kind(),
                child,
            }
        })
    }

    /// Child query restricted to this resource's scope and discriminator.
    fn scoped_query(&self, binding: &ChildBinding) -> QueryBuilder {
        let mut query = QueryBuilder::new(binding.child.table_def().table);
        for (child_column, parent_column) in binding.scope {
            query.set_parameter(*child_column, self.value(parent_column));
        }
        if let Some(discriminator) = binding.discriminator.filter(|d| d.filters) {
            query.set_parameter(discriminator.column, discriminator.value.to_string());
        }
        query
    }

    fn keyed_query(&self, binding: &ChildBinding, key: &str) -> QueryBuilder {
        let mut query = self.scoped_query(binding);
        if let Some(key_column) = binding.key_column {
            query.set_parameter(key_column, key.to_string());
        }
        query
    }
}

impl ResourceNode for Resource {
    fn create(&self, child: ResourceType) -> RegistryResult<Resource> {
        let binding = self.binding_for(child, "create")?;

        let mut record = Record::from_row(EntityData::blank(child).to_row());
        for (child_column, parent_column) in binding.scope.iter().chain(binding.inherit) {
            record.set(child_column, self.value(parent_column));
        }
        if let Some(discriminator) = binding.discriminator {
            record.set(
                discriminator.column,
                Value::Text(discriminator.value.to_string()),
            );
        }

        let data = EntityData::from_record(child, &record)?;
        Ok(Resource::with_parents(data, vec![self.clone()]))
    }

    fn get(&self, store: &Store, child: ResourceType, key: &str) -> RegistryResult<Resource> {
        let started_at = Instant::now();
        let binding = self.binding_for(child, "get")?;
        let statement = self.keyed_query(binding, key).select_query();

        let result = store.run(|tx| -> RegistryResult<Resource> {
            let records = statement.fetch(tx)?;
            match records.as_slice() {
                [record] => materialize(tx, child, record),
                [] => Err(RegistryError::NotFound {
                    kind: child,
                    key: key.to_string(),
                }),
                many => Err(RegistryError::AmbiguousResult {
                    kind: child,
                    key: key.to_string(),
                    matches: many.len(),
                }),
            }
        });

        debug!(
            "event=resource_get module=resource status={} parent={} child={} duration_ms={}",
            if result.is_ok() { "ok" } else { "error" },
            self.kind(),
            child,
            started_at.elapsed().as_millis()
        );
        result
    }

    fn list(&self, store: &Store, child: ResourceType) -> RegistryResult<Vec<Resource>> {
        let started_at = Instant::now();
        let binding = self.binding_for(child, "list")?;
        let statement = self.scoped_query(binding).select_query();

        let children = store.run(|tx| -> RegistryResult<Vec<Resource>> {
            statement
                .fetch(tx)?
                .iter()
                .map(|record| materialize(tx, child, record))
                .collect()
        })?;

        debug!(
            "event=resource_list module=resource status=ok parent={} child={} count={} duration_ms={}",
            self.kind(),
            child,
            children.len(),
            started_at.elapsed().as_millis()
        );
        Ok(children)
    }

    fn delete(&self, store: &Store, child: ResourceType, key: &str) -> RegistryResult<()> {
        let started_at = Instant::now();
        let binding = self.binding_for(child, "delete")?;
        let statement = self.keyed_query(binding, key).delete_query();

        let removed = store.run_immediate(|tx| -> RegistryResult<usize> {
            Ok(statement.execute(tx)?)
        })?;

        debug!(
            "event=resource_delete module=resource status=ok parent={} child={} removed={} duration_ms={}",
            self.kind(),
            child,
            removed,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn save(&self, store: &Store) -> RegistryResult<()> {
        upsert::save(self, store)
    }
}
