//! Tenant-level registry facade.
//!
//! # Responsibility
//! - Resolve root records (gateways, users, configuration) that have no
//!   parent resource to navigate from.
//! - Wire gateway membership through the resource tree.
//!
//! # Invariants
//! - Writes go through `ResourceNode::save` so key validation applies.
//! - `gateway(id)` never writes; an unknown id yields an unsaved resource.

use super::search::{self, ExperimentField, ProjectField, SearchOptions, TimeWindow};
use super::statistics::{self, ExperimentStatistics, StatisticsFilter};
use crate::db::Store;
use crate::model::{Configuration, Gateway, GatewayWorker, User};
use crate::query::QueryBuilder;
use crate::resource::{
    materialize, RegistryError, RegistryResult, Resource, ResourceNode, ResourceType,
};
use crate::schema::{configuration as cfg, gateway as g};
use log::{info, warn};

/// Entry point for callers that start from identifiers, not resources.
pub struct RegistryService {
    store: Store,
}

impl RegistryService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Existing gateway, or a blank unsaved one carrying `gateway_id`.
    pub fn gateway(&self, gateway_id: &str) -> RegistryResult<Resource> {
        match self.get_gateway(gateway_id) {
            Err(err) if err.is_not_found() => Ok(Resource::from_entity(Gateway {
                gateway_id: gateway_id.to_string(),
                ..Gateway::default()
            })),
            other => other,
        }
    }

    pub fn get_gateway(&self, gateway_id: &str) -> RegistryResult<Resource> {
        let mut query = QueryBuilder::new(g::TABLE);
        query.set_parameter(g::GATEWAY_ID, gateway_id.to_string());
        self.fetch_one(ResourceType::Gateway, gateway_id, &query)
    }

    pub fn gateway_exists(&self, gateway_id: &str) -> bool {
        match self.get_gateway(gateway_id) {
            Ok(_) => true,
            Err(err) => {
                if !err.is_not_found() {
                    warn!(
                        "event=gateway_exists module=service status=error error={}",
                        err
                    );
                }
                false
            }
        }
    }

    pub fn list_gateways(&self) -> RegistryResult<Vec<Resource>> {
        self.fetch_all(ResourceType::Gateway, &QueryBuilder::new(g::TABLE))
    }

    /// Removes the gateway and, through cascading keys, everything under it.
    pub fn remove_gateway(&self, gateway_id: &str) -> RegistryResult<()> {
        let mut query = QueryBuilder::new(g::TABLE);
        query.set_parameter(g::GATEWAY_ID, gateway_id.to_string());
        let statement = query.delete_query();
        let removed =
            self.store
                .run_immediate(|tx| -> RegistryResult<usize> { Ok(statement.execute(tx)?) })?;

        info!(
            "event=gateway_remove module=service status=ok removed={}",
            removed
        );
        Ok(())
    }

    pub fn add_user(&self, user_name: &str, password: Option<&str>) -> RegistryResult<Resource> {
        let user = Resource::from_entity(User {
            user_name: user_name.to_string(),
            password: password.map(str::to_string),
        });
        user.save(&self.store)?;
        Ok(user)
    }

    pub fn user_exists(&self, user_name: &str) -> bool {
        Resource::blank(ResourceType::Gateway).exists(&self.store, ResourceType::User, user_name)
    }

    pub fn get_user(&self, user_name: &str) -> RegistryResult<Resource> {
        Resource::blank(ResourceType::Gateway).get(&self.store, ResourceType::User, user_name)
    }

    /// Removes the user together with every gateway membership it holds.
    pub fn remove_user(&self, user_name: &str) -> RegistryResult<()> {
        Resource::blank(ResourceType::Gateway).delete(&self.store, ResourceType::User, user_name)
    }

    /// Registers `user_name` as a worker of `gateway_id`. Both must exist.
    pub fn add_gateway_worker(&self, gateway_id: &str, user_name: &str) -> RegistryResult<Resource> {
        let gateway = self.get_gateway(gateway_id)?;
        let user = self.get_user(user_name)?;

        let mut worker = gateway.create(ResourceType::GatewayWorker)?;
        worker.entity_mut::<GatewayWorker>()?.user_name = user_name.to_string();
        worker.save(&self.store)?;

        let worker_data = worker.into_data();
        Ok(Resource::with_parents(worker_data, vec![gateway, user]))
    }

    pub fn get_worker(&self, gateway_id: &str, user_name: &str) -> RegistryResult<Resource> {
        self.gateway(gateway_id)?
            .get(&self.store, ResourceType::GatewayWorker, user_name)
    }

    pub fn remove_gateway_worker(&self, gateway_id: &str, user_name: &str) -> RegistryResult<()> {
        self.gateway(gateway_id)?
            .delete(&self.store, ResourceType::GatewayWorker, user_name)
    }

    /// Adds one value under `key`; an existing `(key, value)` pair is updated.
    pub fn add_configuration(
        &self,
        key: &str,
        value: &str,
        expire_date: i64,
        category_id: Option<&str>,
    ) -> RegistryResult<Resource> {
        let entry = Resource::from_entity(Configuration {
            config_key: key.to_string(),
            config_val: value.to_string(),
            expire_date,
            category_id: category_id.map(str::to_string),
        });
        entry.save(&self.store)?;
        Ok(entry)
    }

    /// First stored value for `key`.
    pub fn get_configuration(&self, key: &str) -> RegistryResult<Resource> {
        self.get_configurations(key)?
            .into_iter()
            .next()
            .ok_or_else(|| RegistryError::NotFound {
                kind: ResourceType::Configuration,
                key: key.to_string(),
            })
    }

    pub fn get_configurations(&self, key: &str) -> RegistryResult<Vec<Resource>> {
        let mut query = QueryBuilder::new(cfg::TABLE);
        query.set_parameter(cfg::CONFIG_KEY, key.to_string());
        self.fetch_all(ResourceType::Configuration, &query)
    }

    pub fn configuration_exists(&self, key: &str) -> bool {
        match self.get_configurations(key) {
            Ok(entries) => !entries.is_empty(),
            Err(err) => {
                warn!(
                    "event=configuration_exists module=service status=error error={}",
                    err
                );
                false
            }
        }
    }

    /// Removes one value of `key`, or every value when `value` is `None`.
    pub fn remove_configuration(&self, key: &str, value: Option<&str>) -> RegistryResult<()> {
        let mut query = QueryBuilder::new(cfg::TABLE);
        query.set_parameter(cfg::CONFIG_KEY, key.to_string());
        if let Some(value) = value {
            query.set_parameter(cfg::CONFIG_VAL, value.to_string());
        }
        let statement = query.delete_query();
        self.store
            .run_immediate(|tx| -> RegistryResult<usize> { Ok(statement.execute(tx)?) })?;
        Ok(())
    }

    pub fn search_projects(
        &self,
        gateway_id: &str,
        user_name: &str,
        filters: &[(ProjectField, &str)],
        options: &SearchOptions,
    ) -> RegistryResult<Vec<Resource>> {
        search::search_projects(&self.store, gateway_id, user_name, filters, options)
    }

    pub fn search_experiments(
        &self,
        gateway_id: &str,
        user_name: &str,
        filters: &[(ExperimentField, &str)],
        created: Option<TimeWindow>,
        options: &SearchOptions,
    ) -> RegistryResult<Vec<Resource>> {
        search::search_experiments(
            &self.store,
            gateway_id,
            user_name,
            filters,
            created,
            options,
        )
    }

    pub fn experiment_statistics(
        &self,
        gateway_id: &str,
        window: TimeWindow,
        filter: StatisticsFilter<'_>,
    ) -> RegistryResult<ExperimentStatistics> {
        statistics::experiment_statistics(&self.store, gateway_id, window, filter)
    }

    fn fetch_all(&self, kind: ResourceType, query: &QueryBuilder) -> RegistryResult<Vec<Resource>> {
        let statement = query.select_query();
        self.store.run(|tx| -> RegistryResult<Vec<Resource>> {
            statement
                .fetch(tx)?
                .iter()
                .map(|record| materialize(tx, kind, record))
                .collect()
        })
    }

    fn fetch_one(
        &self,
        kind: ResourceType,
        key: &str,
        query: &QueryBuilder,
    ) -> RegistryResult<Resource> {
        let mut found = self.fetch_all(kind, query)?;
        match found.len() {
            1 => Ok(found.remove(0)),
            0 => Err(RegistryError::NotFound {
                kind,
                key: key.to_string(),
            }),
            matches => Err(RegistryError::AmbiguousResult {
                kind,
                key: key.to_string(),
                matches,
            }),
        }
    }
}

impl From<Store> for RegistryService {
    fn from(store: Store) -> Self {
        Self::new(store)
    }
}
