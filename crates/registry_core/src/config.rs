//! Registry runtime configuration.
//!
//! # Responsibility
//! - Describe where the registry store lives and how units of work behave.
//! - Overlay process environment variables on top of defaults.
//!
//! # Invariants
//! - Absent `db_path` selects an in-memory store.
//! - Invalid environment values are reported, never silently ignored.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "REGISTRY_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "REGISTRY_BUSY_TIMEOUT_MS";
pub const ENV_OPERATION_TIMEOUT_MS: &str = "REGISTRY_OPERATION_TIMEOUT_MS";
pub const ENV_UPSERT_STRATEGY: &str = "REGISTRY_UPSERT_STRATEGY";
pub const ENV_LOG_LEVEL: &str = "REGISTRY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "REGISTRY_LOG_DIR";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// How `save` turns a resource into a persisted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertStrategy {
    /// Find by primary key in one unit of work, then update or insert in a
    /// second one.
    #[default]
    TwoPhase,
    /// One `INSERT ... ON CONFLICT DO UPDATE` statement.
    SingleStatement,
}

impl UpsertStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TwoPhase => "two_phase",
            Self::SingleStatement => "single_statement",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "two_phase" => Some(Self::TwoPhase),
            "single_statement" => Some(Self::SingleStatement),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub db_path: Option<PathBuf>,
    pub busy_timeout_ms: u64,
    pub operation_timeout_ms: Option<u64>,
    pub upsert_strategy: UpsertStrategy,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            operation_timeout_ms: None,
            upsert_strategy: UpsertStrategy::default(),
            log_level: None,
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

impl RegistryConfig {
    /// Builds a configuration from defaults plus `REGISTRY_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Applies every variable `lookup` knows about on top of `self`.
    ///
    /// Blank values are treated as unset.
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(ENV_DB_PATH) {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = read(ENV_BUSY_TIMEOUT_MS) {
            self.busy_timeout_ms = parse_millis(ENV_BUSY_TIMEOUT_MS, raw)?;
        }
        if let Some(raw) = read(ENV_OPERATION_TIMEOUT_MS) {
            self.operation_timeout_ms = Some(parse_millis(ENV_OPERATION_TIMEOUT_MS, raw)?);
        }
        if let Some(raw) = read(ENV_UPSERT_STRATEGY) {
            self.upsert_strategy =
                UpsertStrategy::parse(&raw).ok_or(ConfigError::InvalidValue {
                    key: ENV_UPSERT_STRATEGY,
                    value: raw,
                    reason: "expected two_phase|single_statement",
                })?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            self.log_level = Some(level);
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }

        Ok(self)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_millis(key: &'static str, raw: String) -> Result<u64, ConfigError> {
    raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw,
        reason: "expected a non-negative integer of milliseconds",
    })
}
