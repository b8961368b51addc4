//! Typed views of the data each relation's remote side provides.
//!
//! Relation data arrives as YAML from the hook tools and is held here
//! between hooks. A record only deserializes once the remote side has set
//! every required key, so "parses" doubles as "relation data is complete".

use std::path::Path;

use ex::fs::{create_dir_all, read, remove_file, write};
use serde_derive::{Deserialize, Serialize};
use serde_yaml::{from_slice, to_vec};

use crate::error::CharmError;
use crate::paths;

/// What the shared-db provider hands back once access is granted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseInterface {
    pub db_host: String,
    pub password: String,
    #[serde(default)]
    pub allowed_units: Option<String>,
}

/// What the message queue provider hands back
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmqpInterface {
    pub hostname: String,
    pub password: String,
}

/// Keystone's answer to an endpoint registration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityInterface {
    pub auth_host: String,
    pub auth_port: String,
    pub auth_protocol: String,
    pub service_tenant: String,
    pub service_username: String,
    pub service_password: String,
    #[serde(default)]
    pub ca_cert: Option<String>,
    #[serde(default)]
    pub api_version: Option<String>,
}

/// PKCS#11 access details from the optional hsm relation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HsmInterface {
    pub library: String,
    pub login: String,
    pub slot_id: String,
}

/// Everything the remote ends have provided so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interfaces {
    pub shared_db: Option<DatabaseInterface>,
    pub amqp: Option<AmqpInterface>,
    pub identity_service: Option<IdentityInterface>,
    pub hsm: Option<HsmInterface>,
}

impl Interfaces {
    pub fn load() -> Result<Self, CharmError> {
        Self::load_from(&paths::interfaces_dir())
    }

    pub fn load_from(dir: &Path) -> Result<Self, CharmError> {
        let shared_db = read(dir.join("shared-db.yaml"))
            .map(|bytes| from_slice(&bytes))
            .unwrap_or(Ok(None))?;
        let amqp = read(dir.join("amqp.yaml"))
            .map(|bytes| from_slice(&bytes))
            .unwrap_or(Ok(None))?;
        let identity_service = read(dir.join("identity-service.yaml"))
            .map(|bytes| from_slice(&bytes))
            .unwrap_or(Ok(None))?;
        let hsm = read(dir.join("hsm.yaml"))
            .map(|bytes| from_slice(&bytes))
            .unwrap_or(Ok(None))?;

        Ok(Self {
            shared_db,
            amqp,
            identity_service,
            hsm,
        })
    }

    pub fn save(&self) -> Result<(), CharmError> {
        self.save_to(&paths::interfaces_dir())
    }

    pub fn save_to(&self, dir: &Path) -> Result<(), CharmError> {
        create_dir_all(dir)?;
        save_entry(dir, "shared-db", &self.shared_db)?;
        save_entry(dir, "amqp", &self.amqp)?;
        save_entry(dir, "identity-service", &self.identity_service)?;
        save_entry(dir, "hsm", &self.hsm)?;
        Ok(())
    }

    /// Take on a relation's raw YAML data. Returns true when the data is
    /// complete for that relation; incomplete or unrecognized data leaves
    /// the record untouched.
    pub fn accept(&mut self, relation: &str, bytes: &[u8]) -> bool {
        match relation {
            "shared-db" => match from_slice(bytes) {
                Ok(parsed) => self.shared_db = Some(parsed),
                Err(_) => return false,
            },
            "amqp" => match from_slice(bytes) {
                Ok(parsed) => self.amqp = Some(parsed),
                Err(_) => return false,
            },
            "identity-service" => match from_slice(bytes) {
                Ok(parsed) => self.identity_service = Some(parsed),
                Err(_) => return false,
            },
            "hsm" => match from_slice(bytes) {
                Ok(parsed) => self.hsm = Some(parsed),
                Err(_) => return false,
            },
            _ => return false,
        }
        true
    }

    /// Forget a relation's data after it departs
    pub fn discard(&mut self, relation: &str) {
        match relation {
            "shared-db" => self.shared_db = None,
            "amqp" => self.amqp = None,
            "identity-service" => self.identity_service = None,
            "hsm" => self.hsm = None,
            _ => {}
        }
    }
}

fn save_entry<T: serde::Serialize>(
    dir: &Path,
    relation: &str,
    value: &Option<T>,
) -> Result<(), CharmError> {
    let path = dir.join(format!("{}.yaml", relation));
    match value {
        Some(value) => write(path, to_vec(value)?)?,
        None => {
            if path.exists() {
                remove_file(path)?;
            }
        }
    }
    Ok(())
}
