//! Registry use-case services.
//!
//! # Responsibility
//! - Offer tenant-level entry points (gateways, users, workers, config).
//! - Provide filtered, paged search over projects and experiments.
//! - Count experiments per lifecycle bucket.
//!
//! # Invariants
//! - Services never bypass `ResourceNode` validation or the unit of work.
//! - Search filters only address whitelisted columns.

pub mod registry_service;
pub mod search;
pub mod statistics;

pub use registry_service::RegistryService;
pub use search::{
    search_experiments, search_projects, ExperimentField, ProjectField, SearchOptions, SortOrder,
    TimeWindow,
};
pub use statistics::{experiment_statistics, ExperimentStatistics, StatisticsFilter};
