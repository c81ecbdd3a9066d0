//! Tenant-level records: gateways, users, their membership and global
//! configuration entries.

use super::{int, opt_text, text, Entity};
use crate::query::{Record, RecordError};
use crate::resource::ResourceType;
use crate::schema::{configuration as cfg, gateway as gw, gateway_worker as gwk, users};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// Root of the hierarchy: one science gateway (tenant).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub gateway_id: String,
    pub gateway_name: Option<String>,
    pub domain: Option<String>,
    pub email_address: Option<String>,
}

impl Entity for Gateway {
    const KIND: ResourceType = ResourceType::Gateway;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (gw::GATEWAY_ID, text(&self.gateway_id)),
            (gw::GATEWAY_NAME, opt_text(&self.gateway_name)),
            (gw::DOMAIN, opt_text(&self.domain)),
            (gw::EMAIL_ADDRESS, opt_text(&self.email_address)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            gateway_id: record.text(gw::GATEWAY_ID)?,
            gateway_name: record.opt_text(gw::GATEWAY_NAME)?,
            domain: record.opt_text(gw::DOMAIN)?,
            email_address: record.opt_text(gw::EMAIL_ADDRESS)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_name: String,
    pub password: Option<String>,
}

impl Entity for User {
    const KIND: ResourceType = ResourceType::User;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (users::USER_NAME, text(&self.user_name)),
            (users::PASSWORD, opt_text(&self.password)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            user_name: record.text(users::USER_NAME)?,
            password: record.opt_text(users::PASSWORD)?,
        })
    }
}

/// Membership of a user in a gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayWorker {
    pub gateway_id: String,
    pub user_name: String,
}

impl Entity for GatewayWorker {
    const KIND: ResourceType = ResourceType::GatewayWorker;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (gwk::GATEWAY_ID, text(&self.gateway_id)),
            (gwk::USER_NAME, text(&self.user_name)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            gateway_id: record.text(gwk::GATEWAY_ID)?,
            user_name: record.text(gwk::USER_NAME)?,
        })
    }
}

/// Global key/value entry; one key may carry several values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub config_key: String,
    pub config_val: String,
    pub expire_date: i64,
    pub category_id: Option<String>,
}

impl Entity for Configuration {
    const KIND: ResourceType = ResourceType::Configuration;

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            (cfg::CONFIG_KEY, text(&self.config_key)),
            (cfg::CONFIG_VAL, text(&self.config_val)),
            (cfg::EXPIRE_DATE, int(self.expire_date)),
            (cfg::CATEGORY_ID, opt_text(&self.category_id)),
        ]
    }

    fn from_record(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            config_key: record.text(cfg::CONFIG_KEY)?,
            config_val: record.text(cfg::CONFIG_VAL)?,
            expire_date: record.int(cfg::EXPIRE_DATE)?,
            category_id: record.opt_text(cfg::CATEGORY_ID)?,
        })
    }
}
