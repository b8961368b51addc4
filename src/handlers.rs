//! Wires the default lifecycle behaviors and the configure sequence into
//! the reactive registry.

use log::info;

use crate::charm::{Endpoint, Lifecycle};
use crate::cmd;
use crate::error::CharmError;
use crate::reactive::{HookContext, Registry};

/// Render configuration from the available relations, sync the database
/// schema, then refresh workload status. Later steps depend on the config
/// file and schema the earlier ones put in place, so the order is fixed.
pub fn configure<C: Lifecycle>(charm: &C, ctx: &HookContext) -> Result<(), CharmError> {
    info!("rendering configuration from available relation data");
    charm.render_with_interfaces(&ctx.interfaces)?;
    charm.db_sync()?;
    charm.assess_status(&ctx.states)?;
    Ok(())
}

/// Build the handler registry: installation, credential requests, SSL,
/// config-changed, the configure sequence, and a trailing status refresh.
pub fn registry() -> Registry {
    let mut registry = Registry::new();

    registry.register("charm.installed", &[], &["charm.installed"], |charm, ctx| {
        charm.install()?;
        ctx.set("charm.installed");
        Ok(())
    });

    registry.register(
        "amqp.requested",
        &["amqp.connected"],
        &["amqp.requested"],
        |charm, ctx| {
            let (username, vhost) = charm.amqp_credentials();
            cmd::run(
                "relation-set",
                &[format!("username={}", username), format!("vhost={}", vhost)],
            )?;
            ctx.set("amqp.requested");
            Ok(())
        },
    );

    registry.register(
        "shared-db.requested",
        &["shared-db.connected"],
        &["shared-db.requested"],
        |charm, ctx| {
            let hostname = unit_private_address()?;
            for request in charm.database_setup() {
                cmd::run(
                    "relation-set",
                    &[
                        format!("database={}", request.database),
                        format!("username={}", request.username),
                        format!("hostname={}", hostname),
                    ],
                )?;
            }
            ctx.set("shared-db.requested");
            Ok(())
        },
    );

    registry.register(
        "identity-service.registered",
        &["identity-service.connected"],
        &["identity-service.registered"],
        |charm, ctx| {
            let address = unit_private_address()?;
            let port = charm.api_ports[charm.default_service.as_str()][&Endpoint::Public];
            let url = format!("http://{}:{}", address, port);
            cmd::run(
                "relation-set",
                &[
                    format!("service={}", charm.name),
                    "region=RegionOne".to_string(),
                    format!("public_url={}", url),
                    format!("internal_url={}", url),
                    format!("admin_url={}", url),
                ],
            )?;
            ctx.set("identity-service.registered");
            Ok(())
        },
    );

    registry.register(
        "identity-service.ssl",
        &["identity-service.available"],
        &[],
        |charm, ctx| charm.configure_ssl(&ctx.interfaces),
    );

    registry.register("config.changed", &["config.changed"], &[], |charm, ctx| {
        if ctx.active("shared-db.available")
            && ctx.active("identity-service.available")
            && ctx.active("amqp.available")
        {
            charm.render_with_interfaces(&ctx.interfaces)?;
        }
        Ok(())
    });

    registry.register(
        "senlin.configure",
        &[
            "shared-db.available",
            "identity-service.available",
            "amqp.available",
        ],
        &[],
        |charm, ctx| configure(&*charm, ctx),
    );

    // registered last so it runs after everything else each hook
    registry.register("update-status", &[], &[], |charm, ctx| {
        charm.assess_status(&ctx.states)
    });

    registry
}

fn unit_private_address() -> Result<String, CharmError> {
    let output = cmd::get_output("unit-get", &["private-address"])?;
    Ok(String::from_utf8_lossy(&output).trim().to_string())
}
