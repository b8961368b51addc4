//! Presents functions related to locating the directories the charm manages

use std::env;
use std::path::PathBuf;

use dirs::home_dir;

/// Get a dir from an env var and subpath
fn dir_from_env(env_var: &str, suffix: PathBuf) -> PathBuf {
    env::var(env_var).map(PathBuf::from).unwrap_or_else(|_| {
        home_dir()
            .unwrap_or_else(|| PathBuf::from("/root"))
            .join(suffix)
    })
}

/// Where the rendered service configuration lives
pub fn config_dir() -> PathBuf {
    env::var("SENLIN_CONF_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| "/etc/senlin".into())
}

/// Where relation states and interface data persist between hooks
pub fn state_dir() -> PathBuf {
    dir_from_env("CHARM_STATE_DIR", ".local/share/charm-senlin".into())
}

pub fn interfaces_dir() -> PathBuf {
    state_dir().join("interfaces")
}

/// Where the identity service's CA certificate is installed
pub fn ca_cert_path() -> PathBuf {
    env::var("SENLIN_CA_CERT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| "/usr/local/share/ca-certificates/keystone_juju_ca_cert.crt".into())
}
