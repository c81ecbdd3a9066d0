use super::ResourceType;
use crate::db::DbError;
use crate::query::RecordError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Error surface of every resource operation.
#[derive(Debug)]
pub enum RegistryError {
    /// The parent kind declares no capability for the child kind.
    UnsupportedType {
        parent: ResourceType,
        child: ResourceType,
    },
    NotFound {
        kind: ResourceType,
        key: String,
    },
    /// A singleton lookup matched more than one row.
    AmbiguousResult {
        kind: ResourceType,
        key: String,
        matches: usize,
    },
    Storage(DbError),
    Validation(String),
    InvalidData(String),
    KindMismatch {
        expected: ResourceType,
        actual: ResourceType,
    },
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedType { parent, child } => {
                write!(f, "unsupported resource type: {parent} cannot hold {child}")
            }
            Self::NotFound { kind, key } => write!(f, "{kind} not found: {key}"),
            Self::AmbiguousResult { kind, key, matches } => {
                write!(f, "{kind} lookup `{key}` matched {matches} rows")
            }
            Self::Storage(err) => write!(f, "{err}"),
            Self::Validation(message) => write!(f, "invalid resource: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::KindMismatch { expected, actual } => {
                write!(f, "expected {expected} resource, found {actual}")
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RegistryError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for RegistryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

impl From<RecordError> for RegistryError {
    fn from(value: RecordError) -> Self {
        Self::InvalidData(value.to_string())
    }
}
