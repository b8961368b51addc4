use std::collections::HashMap;

use serde_derive::{Deserialize, Serialize};

/// Network roles an API endpoint is published on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub enum Endpoint {
    Public,
    Admin,
    Internal,
}

impl Endpoint {
    pub fn all() -> &'static [Endpoint] {
        &[Endpoint::Public, Endpoint::Admin, Endpoint::Internal]
    }
}

impl From<Endpoint> for &str {
    fn from(endpoint: Endpoint) -> &'static str {
        match endpoint {
            Endpoint::Public => "public",
            Endpoint::Admin => "admin",
            Endpoint::Internal => "internal",
        }
    }
}

/// Listening port for each service, per network role
pub type PortMap = HashMap<String, HashMap<Endpoint, u16>>;

/// The one API service listens on 8778 on every role
pub fn api_ports() -> PortMap {
    let mut roles = HashMap::new();
    for endpoint in Endpoint::all() {
        roles.insert(*endpoint, 8778);
    }

    let mut ports = HashMap::new();
    ports.insert("senlin-api".to_string(), roles);
    ports
}
