//! Gateway-scoped catalog documents and workflow templates.
//!
//! Descriptor bodies are opaque documents; the registry stores them as text
//! and never parses them.

use super::{int, opt_text, text, Entity};
use crate::query::{Record, RecordError};
use crate::resource::ResourceType;
use crate::schema::{
    application_descriptor as ad, host_descriptor as hd, published_workflow as pw,
    service_descriptor as sd, user_workflow as uw,
};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDescriptor {
    pub gateway_id: String,
    pub host_descriptor_id: String,
    pub updated_user: Option<String>,
    pub content: Option<String>,
}

impl Entity for HostDescriptor {
    const KIND: ResourceType = ResourceType::HostDescriptor;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (hd::GATEWAY_ID, text(&self.gateway_id)),
            (hd::HOST_DESCRIPTOR_ID, text(&self.host_descriptor_id)),
            (hd::UPDATED_USER, opt_text(&self.updated_user)),
            (hd::HOST_DESCRIPTOR_XML, opt_text(&self.content)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            gateway_id: record.text(hd::GATEWAY_ID)?,
            host_descriptor_id: record.text(hd::HOST_DESCRIPTOR_ID)?,
            updated_user: record.opt_text(hd::UPDATED_USER)?,
            content: record.opt_text(hd::HOST_DESCRIPTOR_XML)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub gateway_id: String,
    pub service_descriptor_id: String,
    pub updated_user: Option<String>,
    pub content: Option<String>,
}

impl Entity for ServiceDescriptor {
    const KIND: ResourceType = ResourceType::ServiceDescriptor;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (sd::GATEWAY_ID, text(&self.gateway_id)),
            (sd::SERVICE_DESCRIPTOR_ID, text(&self.service_descriptor_id)),
            (sd::UPDATED_USER, opt_text(&self.updated_user)),
            (sd::SERVICE_DESCRIPTOR_XML, opt_text(&self.content)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            gateway_id: record.text(sd::GATEWAY_ID)?,
            service_descriptor_id: record.text(sd::SERVICE_DESCRIPTOR_ID)?,
            updated_user: record.opt_text(sd::UPDATED_USER)?,
            content: record.opt_text(sd::SERVICE_DESCRIPTOR_XML)?,
        })
    }
}

/// Deployment of a service on a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDescriptor {
    pub gateway_id: String,
    pub application_descriptor_id: String,
    pub host_descriptor_id: Option<String>,
    pub service_descriptor_id: Option<String>,
    pub updated_user: Option<String>,
    pub content: Option<String>,
}

impl Entity for ApplicationDescriptor {
    const KIND: ResourceType = ResourceType::ApplicationDescriptor;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (ad::GATEWAY_ID, text(&self.gateway_id)),
            (
                ad::APPLICATION_DESCRIPTOR_ID,
                text(&self.application_descriptor_id),
            ),
            (ad::HOST_DESCRIPTOR_ID, opt_text(&self.host_descriptor_id)),
            (ad::SERVICE_DESCRIPTOR_ID, opt_text(&self.service_descriptor_id)),
            (ad::UPDATED_USER, opt_text(&self.updated_user)),
            (ad::APPLICATION_DESCRIPTOR_XML, opt_text(&self.content)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            gateway_id: record.text(ad::GATEWAY_ID)?,
            application_descriptor_id: record.text(ad::APPLICATION_DESCRIPTOR_ID)?,
            host_descriptor_id: record.opt_text(ad::HOST_DESCRIPTOR_ID)?,
            service_descriptor_id: record.opt_text(ad::SERVICE_DESCRIPTOR_ID)?,
            updated_user: record.opt_text(ad::UPDATED_USER)?,
            content: record.opt_text(ad::APPLICATION_DESCRIPTOR_XML)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedWorkflow {
    pub gateway_id: String,
    pub publish_workflow_name: String,
    pub version: Option<String>,
    pub published_date: i64,
    pub path: Option<String>,
    pub workflow_content: Option<String>,
    pub created_user: Option<String>,
}

impl Entity for PublishedWorkflow {
    const KIND: ResourceType = ResourceType::PublishedWorkflow;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (pw::GATEWAY_ID, text(&self.gateway_id)),
            (pw::PUBLISH_WORKFLOW_NAME, text(&self.publish_workflow_name)),
            (pw::VERSION, opt_text(&self.version)),
            (pw::PUBLISHED_DATE, int(self.published_date)),
            (pw::PATH, opt_text(&self.path)),
            (pw::WORKFLOW_CONTENT, opt_text(&self.workflow_content)),
            (pw::CREATED_USER, opt_text(&self.created_user)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            gateway_id: record.text(pw::GATEWAY_ID)?,
            publish_workflow_name: record.text(pw::PUBLISH_WORKFLOW_NAME)?,
            version: record.opt_text(pw::VERSION)?,
            published_date: record.int(pw::PUBLISHED_DATE)?,
            path: record.opt_text(pw::PATH)?,
            workflow_content: record.opt_text(pw::WORKFLOW_CONTENT)?,
            created_user: record.opt_text(pw::CREATED_USER)?,
        })
    }
}

/// Private workflow template of one gateway worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWorkflow {
    pub gateway_id: String,
    pub owner: String,
    pub template_name: String,
    pub project_id: Option<String>,
    pub path: Option<String>,
    pub workflow_graph: Option<String>,
    pub last_updated_time: i64,
}

impl Entity for UserWorkflow {
    const KIND: ResourceType = ResourceType::UserWorkflow;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (uw::GATEWAY_ID, text(&self.gateway_id)),
            (uw::OWNER, text(&self.owner)),
            (uw::TEMPLATE_NAME, text(&self.template_name)),
            (uw::PROJECT_ID, opt_text(&self.project_id)),
            (uw::PATH, opt_text(&self.path)),
            (uw::WORKFLOW_GRAPH, opt_text(&self.workflow_graph)),
            (uw::LAST_UPDATED_TIME, int(self.last_updated_time)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            gateway_id: record.text(uw::GATEWAY_ID)?,
            owner: record.text(uw::OWNER)?,
            template_name: record.text(uw::TEMPLATE_NAME)?,
            project_id: record.opt_text(uw::PROJECT_ID)?,
            path: record.opt_text(uw::PATH)?,
            workflow_graph: record.opt_text(uw::WORKFLOW_GRAPH)?,
            last_updated_time: record.int(uw::LAST_UPDATED_TIME)?,
        })
    }
}
