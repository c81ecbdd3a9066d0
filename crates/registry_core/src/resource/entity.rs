//! Tagged union over every entity struct.
//!
//! # Invariants
//! - `EntityData::kind()` and the variant always agree.
//! - Adding a kind means adding one line to `entity_data!`; dispatch code
//!   never matches on concrete entity types.

use super::ResourceType;
use crate::model::*;
use crate::query::{Record, RecordError};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Typed projection between a `Resource` and one concrete entity struct.
pub trait EntityCast: Entity {
    fn cast(data: &EntityData) -> Option<&Self>;
    fn cast_mut(data: &mut EntityData) -> Option<&mut Self>;
    fn into_data(self) -> EntityData;
}

macro_rules! entity_data {
    ($($kind:ident => $ty:ty),+ $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kind", content = "data", rename_all = "snake_case")]
        pub enum EntityData {
            $($kind($ty)),+
        }

        impl EntityData {
            pub fn kind(&self) -> ResourceType {
                match self {
                    $(Self::$kind(_) => ResourceType::$kind),+
                }
            }

            pub fn to_row(&self) -> Vec<(&'static str, Value)> {
                match self {
                    $(Self::$kind(entity) => entity.to_row()),+
                }
            }

            pub fn from_record(kind: ResourceType, record: &Record) -> Result<Self, RecordError> {
                match kind {
                    $(ResourceType::$kind => <$ty as Entity>::from_record(record).map(Self::$kind)),+
                }
            }

            pub fn blank(kind: ResourceType) -> Self {
                match kind {
                    $(ResourceType::$kind => Self::$kind(<$ty as Entity>::blank())),+
                }
            }
        }

        $(
            impl EntityCast for $ty {
                fn cast(data: &EntityData) -> Option<&Self> {
                    match data {
                        EntityData::$kind(entity) => Some(entity),
                        _ => None,
                    }
                }

                fn cast_mut(data: &mut EntityData) -> Option<&mut Self> {
                    match data {
                        EntityData::$kind(entity) => Some(entity),
                        _ => None,
                    }
                }

                fn into_data(self) -> EntityData {
                    EntityData::$kind(self)
                }
            }
        )+
    };
}

entity_data! {
    Gateway => Gateway,
    User => User,
    GatewayWorker => GatewayWorker,
    Project => Project,
    Experiment => Experiment,
    ExperimentInput => ExperimentInput,
    ExperimentOutput => ExperimentOutput,
    ConfigData => ConfigData,
    WorkflowNodeDetail => WorkflowNodeDetail,
    NodeInput => NodeInput,
    NodeOutput => NodeOutput,
    TaskDetail => TaskDetail,
    ApplicationInput => ApplicationInput,
    ApplicationOutput => ApplicationOutput,
    JobDetail => JobDetail,
    DataTransferDetail => DataTransferDetail,
    Status => Status,
    ErrorDetail => ErrorDetail,
    ComputationalResourceScheduling => ComputationalResourceScheduling,
    AdvancedInputDataHandling => AdvancedInputDataHandling,
    AdvancedOutputDataHandling => AdvancedOutputDataHandling,
    QosParam => QosParam,
    NotificationEmail => NotificationEmail,
    HostDescriptor => HostDescriptor,
    ServiceDescriptor => ServiceDescriptor,
    ApplicationDescriptor => ApplicationDescriptor,
    PublishedWorkflow => PublishedWorkflow,
    UserWorkflow => UserWorkflow,
    Configuration => Configuration,
}
