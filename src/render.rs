//! Renders the managed configuration files from relation data.

use std::path::Path;

use ex::fs::{create_dir_all, read, write};
use log::info;

use crate::charm::{SenlinCharm, API_PASTE_CONF, SENLIN_CONF};
use crate::error::CharmError;
use crate::interfaces::Interfaces;

const API_PASTE: &str = "[pipeline:senlin-api]
pipeline = request_id faultwrap ssl versionnegotiation authtoken context apiv1app

[app:apiv1app]
paste.app_factory = senlin.api.common.wsgi:app_factory
senlin.app_factory = senlin.api.openstack.v1.router:API

[filter:authtoken]
paste.filter_factory = keystonemiddleware.auth_token:filter_factory
";

/// Write every file in the charm's restart map, and report which services
/// are owed a restart. A file whose content did not change restarts
/// nothing.
pub fn render_configs(
    charm: &SenlinCharm,
    interfaces: &Interfaces,
) -> Result<Vec<String>, CharmError> {
    let mut restart: Vec<String> = Vec::new();

    for (path, services) in &charm.restart_map {
        let content = match path.file_name().and_then(|name| name.to_str()) {
            Some(SENLIN_CONF) => senlin_conf(charm, interfaces),
            Some(API_PASTE_CONF) => API_PASTE.to_string(),
            _ => continue,
        };

        if write_if_changed(path, &content)? {
            info!("rendered {}", path.display());
            for service in services {
                if !restart.contains(service) {
                    restart.push(service.clone());
                }
            }
        }
    }

    Ok(restart)
}

fn write_if_changed(path: &Path, content: &str) -> Result<bool, CharmError> {
    if read(path).ok().as_deref() == Some(content.as_bytes()) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    write(path, content.as_bytes())?;
    Ok(true)
}

fn senlin_conf(charm: &SenlinCharm, interfaces: &Interfaces) -> String {
    let mut conf = String::from("[DEFAULT]\nauth_strategy = keystone\ndebug = false\n");

    if let Some(amqp) = &interfaces.amqp {
        let (username, vhost) = charm.amqp_credentials();
        conf.push_str(&format!(
            "transport_url = rabbit://{}:{}@{}:5672/{}\n",
            username, amqp.password, amqp.hostname, vhost
        ));
    }

    let setup = charm.database_setup();
    if let (Some(db), Some(request)) = (&interfaces.shared_db, setup.first()) {
        conf.push_str(&format!(
            "\n[database]\nconnection = mysql+pymysql://{}:{}@{}/{}\n",
            request.username, db.password, db.db_host, request.database
        ));
    }

    if let Some(identity) = &interfaces.identity_service {
        let auth_url = format!(
            "{}://{}:{}",
            identity.auth_protocol, identity.auth_host, identity.auth_port
        );
        conf.push_str(&format!(
            "\n[keystone_authtoken]\nauth_type = password\nauth_url = {}\n\
             www_authenticate_uri = {}\nproject_name = {}\nusername = {}\npassword = {}\n",
            auth_url,
            auth_url,
            identity.service_tenant,
            identity.service_username,
            identity.service_password
        ));
    }

    if let Some(hsm) = &interfaces.hsm {
        conf.push_str(&format!(
            "\n[hsm]\nlibrary = {}\nlogin = {}\nslot_id = {}\n",
            hsm.library, hsm.login, hsm.slot_id
        ));
    }

    conf
}
