//! Metadata registry core for a scientific-workflow platform.
//! Persists gateways, projects, experiments and their execution tree in
//! SQLite behind one generic resource-node contract.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod resource;
pub mod schema;
pub mod service;

pub use config::{ConfigError, RegistryConfig, UpsertStrategy};
pub use db::{CancelToken, DbError, DbResult, RunContext, Store, StoreOptions, TxMode};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use query::{QueryBuilder, Record, RecordError, Statement};
pub use resource::{
    EntityCast, EntityData, RegistryError, RegistryResult, Resource, ResourceNode, ResourceType,
};
pub use service::{ExperimentStatistics, RegistryService, SearchOptions, SortOrder};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
