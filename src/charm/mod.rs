pub mod ports;
pub mod release;

pub use ports::{Endpoint, PortMap};
pub use release::OpenStackRelease;

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use ex::fs::{read, write};
use log::info;

use crate::cmd;
use crate::error::CharmError;
use crate::interfaces::Interfaces;
use crate::paths;
use crate::reactive::StateSet;
use crate::render;
use crate::status::{self, StateCheck, WorkloadState};

pub const PACKAGES: &[&str] = &["senlin-api", "senlin-common", "senlin-engine", "python-pymysql"];
pub const SERVICES: &[&str] = &["senlin-api", "senlin-engine"];

pub const SENLIN_CONF: &str = "senlin.conf";
pub const API_PASTE_CONF: &str = "api-paste.ini";

/// A database access request sent over the shared-db relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSetup {
    pub username: String,
    pub database: String,
}

/// Static facts the deployment is driven by: what to install, which files
/// are managed and which services restart when they change, which ports are
/// published, and what each relation is asked for.
///
/// Constructed once per process and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SenlinCharm {
    pub name: String,
    pub release: OpenStackRelease,
    pub release_pkg: String,
    pub packages: Vec<String>,
    pub services: Vec<String>,
    pub default_service: String,

    /// Relations the unit cannot run without. The identity-service and hsm
    /// relations are consumed when present but are not mandatory.
    pub required_relations: Vec<String>,

    /// Managed file to the services restarted when its content changes
    pub restart_map: BTreeMap<PathBuf, Vec<String>>,

    pub api_ports: PortMap,
    pub sync_cmd: Vec<String>,
}

impl SenlinCharm {
    pub fn new() -> Self {
        Self::with_config_dir(paths::config_dir())
    }

    /// Build the descriptor with its managed files under `config_dir`
    pub fn with_config_dir<P: Into<PathBuf>>(config_dir: P) -> Self {
        let config_dir = config_dir.into();
        let services: Vec<String> = SERVICES.iter().map(|s| s.to_string()).collect();

        let mut restart_map = BTreeMap::new();
        restart_map.insert(config_dir.join(SENLIN_CONF), services.clone());
        restart_map.insert(config_dir.join(API_PASTE_CONF), services.clone());

        Self {
            name: "senlin".to_string(),
            release: OpenStackRelease::Mitaka,
            release_pkg: "senlin".to_string(),
            packages: PACKAGES.iter().map(|p| p.to_string()).collect(),
            services,
            default_service: "senlin-api".to_string(),
            required_relations: vec!["shared-db".to_string(), "amqp".to_string()],
            restart_map,
            api_ports: ports::api_ports(),
            sync_cmd: vec!["senlin-manage".to_string(), "db_sync".to_string()],
        }
    }

    /// The username and vhost to request from the message queue provider
    pub fn amqp_credentials(&self) -> (&'static str, &'static str) {
        ("senlin", "openstack")
    }

    /// The database access requests to send to the shared-db provider
    pub fn database_setup(&self) -> Vec<DatabaseSetup> {
        vec![DatabaseSetup {
            username: "senlin".to_string(),
            database: "senlin".to_string(),
        }]
    }

    /// The per-relation checks workload status is assessed against.
    ///
    /// `required_relations` overrides the descriptor's own relation list
    /// when given, so a caller holding extra mandatory relations (an hsm
    /// unit, say) can enforce them on the same assessment path.
    pub fn states_to_check(
        &self,
        required_relations: Option<&[String]>,
    ) -> Vec<(String, Vec<StateCheck>)> {
        let relations = required_relations.unwrap_or(&self.required_relations);
        status::states_to_check(relations)
    }

    /// Install the package set
    pub fn install(&self) -> Result<(), CharmError> {
        self.publish_status(WorkloadState::Maintenance, "Installing packages")?;

        let mut args = vec!["install", "-y"];
        args.extend(self.packages.iter().map(String::as_str));
        cmd::run("apt-get", &args)?;

        if let Some(release) = self.installed_release() {
            info!("installed packages from the {} release", release.to_string());
        }
        Ok(())
    }

    /// The release the installed archive belongs to, read off the version
    /// of the marker package the codename table is keyed on. None when the
    /// marker package is absent or its version is not in the table.
    pub fn installed_release(&self) -> Option<OpenStackRelease> {
        let package = "nova-common";
        let output = cmd::get_output("dpkg-query", &["-W", "-f=${Version}", package]).ok()?;
        let version = String::from_utf8_lossy(&output).trim().to_string();
        release::release_for_version(package, &version)
    }

    /// Render every managed file from the available relation data and
    /// restart the services owed a restart
    pub fn render_with_interfaces(&self, interfaces: &Interfaces) -> Result<Vec<String>, CharmError> {
        let restart = render::render_configs(self, interfaces)?;
        for service in &restart {
            cmd::run("systemctl", &["restart", service.as_str()])?;
        }
        Ok(restart)
    }

    /// Run the database schema synchronization command
    pub fn db_sync(&self) -> Result<(), CharmError> {
        info!("syncing database schema");
        cmd::run(&self.sync_cmd[0], &self.sync_cmd[1..])
    }

    /// Recompute workload status from the relation states and publish it
    pub fn assess_status(&self, active: &StateSet) -> Result<(), CharmError> {
        let checks = self.states_to_check(None);
        let (state, message) = status::assess(&checks, active);
        self.publish_status(state, &message)
    }

    fn publish_status(&self, state: WorkloadState, message: &str) -> Result<(), CharmError> {
        cmd::run("status-set", &[state.into(), message])
    }

    /// Install the identity service's CA certificate when one is offered
    pub fn configure_ssl(&self, interfaces: &Interfaces) -> Result<(), CharmError> {
        let ca_cert = match &interfaces.identity_service {
            Some(identity) => match &identity.ca_cert {
                Some(ca_cert) => ca_cert,
                None => return Ok(()),
            },
            None => return Ok(()),
        };

        let path = paths::ca_cert_path();
        if read(&path).ok().as_deref() == Some(ca_cert.as_bytes()) {
            return Ok(());
        }
        write(&path, ca_cert.as_bytes())?;
        cmd::run("update-ca-certificates", &["--fresh"])
    }
}

impl Default for SenlinCharm {
    fn default() -> Self {
        Self::new()
    }
}

/// The operations the configure sequence drives, in the order it drives
/// them: render, schema sync, status refresh.
pub trait Lifecycle {
    fn render_with_interfaces(&self, interfaces: &Interfaces) -> Result<(), CharmError>;
    fn db_sync(&self) -> Result<(), CharmError>;
    fn assess_status(&self, active: &StateSet) -> Result<(), CharmError>;
}

impl Lifecycle for SenlinCharm {
    fn render_with_interfaces(&self, interfaces: &Interfaces) -> Result<(), CharmError> {
        SenlinCharm::render_with_interfaces(self, interfaces).map(|_| ())
    }

    fn db_sync(&self) -> Result<(), CharmError> {
        SenlinCharm::db_sync(self)
    }

    fn assess_status(&self, active: &StateSet) -> Result<(), CharmError> {
        SenlinCharm::assess_status(self, active)
    }
}

static INSTANCE: Mutex<Option<SenlinCharm>> = Mutex::new(None);

/// Exclusive access to the process-wide charm instance. Released when the
/// guard drops, on every exit path.
pub struct CharmGuard(MutexGuard<'static, Option<SenlinCharm>>);

impl Deref for CharmGuard {
    type Target = SenlinCharm;

    fn deref(&self) -> &SenlinCharm {
        self.0.as_ref().expect("charm instance is initialized")
    }
}

impl DerefMut for CharmGuard {
    fn deref_mut(&mut self) -> &mut SenlinCharm {
        self.0.as_mut().expect("charm instance is initialized")
    }
}

/// Acquire the charm instance, creating it on first use
pub fn provide_charm_instance() -> CharmGuard {
    let mut guard = INSTANCE.lock().unwrap_or_else(|err| err.into_inner());
    if guard.is_none() {
        *guard = Some(SenlinCharm::new());
    }
    CharmGuard(guard)
}
