use std::path::PathBuf;

use senlin_charm::charm::release::{release_for_version, OpenStackRelease};
use senlin_charm::charm::{provide_charm_instance, DatabaseSetup, Endpoint, SenlinCharm};
use senlin_charm::status::{StateCheck, WorkloadState};

#[test]
fn amqp_credentials() {
    let charm = SenlinCharm::with_config_dir("/etc/senlin");
    assert_eq!(charm.amqp_credentials(), ("senlin", "openstack"));
}

#[test]
fn database_setup() {
    let charm = SenlinCharm::with_config_dir("/etc/senlin");
    assert_eq!(
        charm.database_setup(),
        vec![DatabaseSetup {
            username: "senlin".to_string(),
            database: "senlin".to_string(),
        }]
    );
}

#[test]
fn states_to_check_uses_declared_relations() {
    let charm = SenlinCharm::with_config_dir("/etc/senlin");
    let checks = charm.states_to_check(None);

    let relations: Vec<_> = checks.iter().map(|(relation, _)| relation.clone()).collect();
    assert_eq!(relations, vec!["shared-db".to_string(), "amqp".to_string()]);

    assert_eq!(
        checks[0].1,
        vec![
            StateCheck {
                state: "shared-db.connected".to_string(),
                err_status: WorkloadState::Blocked,
                message: "'shared-db' missing".to_string(),
            },
            StateCheck {
                state: "shared-db.available".to_string(),
                err_status: WorkloadState::Waiting,
                message: "'shared-db' incomplete".to_string(),
            },
        ]
    );
}

#[test]
fn states_to_check_honors_override() {
    let charm = SenlinCharm::with_config_dir("/etc/senlin");
    let required = vec!["hsm".to_string(), "amqp".to_string()];
    let checks = charm.states_to_check(Some(&required));

    let relations: Vec<_> = checks.iter().map(|(relation, _)| relation.clone()).collect();
    assert_eq!(relations, required);
    assert_eq!(checks[0].1[0].state, "hsm.connected");
}

#[test]
fn restart_map_covers_both_config_files() {
    let charm = SenlinCharm::with_config_dir("/etc/senlin");
    let services = vec!["senlin-api".to_string(), "senlin-engine".to_string()];

    let files: Vec<_> = charm.restart_map.keys().cloned().collect();
    assert_eq!(
        files,
        vec![
            PathBuf::from("/etc/senlin/api-paste.ini"),
            PathBuf::from("/etc/senlin/senlin.conf"),
        ]
    );
    for restarted in charm.restart_map.values() {
        assert_eq!(restarted, &services);
    }
}

#[test]
fn api_port_is_identical_on_every_role() {
    let charm = SenlinCharm::with_config_dir("/etc/senlin");
    let roles = &charm.api_ports["senlin-api"];

    assert_eq!(roles.len(), 3);
    for endpoint in Endpoint::all() {
        assert_eq!(roles[endpoint], 8778);
    }
}

#[test]
fn release_lookup_follows_the_codename_table() {
    assert_eq!(
        release_for_version("nova-common", "2:2.0.0-0ubuntu1"),
        Some(OpenStackRelease::Newton)
    );
    assert_eq!(
        release_for_version("nova-common", "5.1.3"),
        Some(OpenStackRelease::Queens)
    );
    assert_eq!(release_for_version("nova-common", "9.0.0"), None);
    assert_eq!(release_for_version("senlin", "2.0.0"), None);
}

#[test]
fn charm_instance_is_scoped() {
    {
        let charm = provide_charm_instance();
        assert_eq!(charm.name, "senlin");
    }

    // the guard released above, so a second acquisition succeeds
    let charm = provide_charm_instance();
    assert_eq!(charm.sync_cmd, vec!["senlin-manage", "db_sync"]);
}
