use clap::{clap_app, crate_description, crate_version};

use senlin_charm::cmd;
use senlin_charm::error::CharmError;
use senlin_charm::handlers;
use senlin_charm::hooklog;
use senlin_charm::reactive::HookContext;

const RELATIONS: &[&str] = &["shared-db", "amqp", "identity-service", "hsm"];

fn main() -> Result<(), String> {
    hooklog::init().map_err(|err| format!("Couldn't install logger: {}", err))?;

    let matches = clap_app!(senlin_hook =>
        (version: crate_version!())
        (about: crate_description!())
        (@arg HOOK: +takes_value +required "The hook the agent invoked")
    )
    .get_matches();

    let hook = matches.value_of("HOOK").expect("Hook name is required.");

    let mut ctx = HookContext::load()?;
    apply_hook(hook, &mut ctx)?;

    handlers::registry().dispatch(&mut ctx)?;

    // config.changed only lives for the hook that observed the change
    ctx.remove("config.changed");
    ctx.save()?;

    Ok(())
}

/// Translate the invoked hook into state transitions before dispatch
fn apply_hook(hook: &str, ctx: &mut HookContext) -> Result<(), CharmError> {
    match hook {
        "install" | "start" | "stop" | "update-status" | "upgrade-charm" | "leader-elected" => {
            return Ok(())
        }
        "config-changed" => {
            ctx.set("config.changed");
            return Ok(());
        }
        _ => {}
    }

    for suffix in &["-relation-joined", "-relation-changed"] {
        if let Some(relation) = strip_suffix(hook, suffix) {
            if !RELATIONS.contains(&relation) {
                return Err(CharmError::UnknownHook(hook.to_string()));
            }

            ctx.set(&format!("{}.connected", relation));

            // The hook tool reads the remote unit the agent set for us
            let data = cmd::get_output("relation-get", &["--format=yaml", "-"])?;
            if ctx.interfaces.accept(relation, &data) {
                ctx.set(&format!("{}.available", relation));
            }
            return Ok(());
        }
    }

    for suffix in &["-relation-departed", "-relation-broken"] {
        if let Some(relation) = strip_suffix(hook, suffix) {
            if !RELATIONS.contains(&relation) {
                return Err(CharmError::UnknownHook(hook.to_string()));
            }

            ctx.remove(&format!("{}.connected", relation));
            ctx.remove(&format!("{}.available", relation));
            ctx.remove(&format!("{}.requested", relation));
            ctx.remove(&format!("{}.registered", relation));
            ctx.interfaces.discard(relation);
            return Ok(());
        }
    }

    Err(CharmError::UnknownHook(hook.to_string()))
}

fn strip_suffix<'a>(hook: &'a str, suffix: &str) -> Option<&'a str> {
    if hook.ends_with(suffix) {
        Some(&hook[..hook.len() - suffix.len()])
    } else {
        None
    }
}
