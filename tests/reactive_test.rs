use std::cell::RefCell;
use std::rc::Rc;

use senlin_charm::charm::Lifecycle;
use senlin_charm::error::CharmError;
use senlin_charm::handlers;
use senlin_charm::interfaces::{DatabaseInterface, Interfaces};
use senlin_charm::reactive::{HookContext, Registry, StateSet};

/// Stand-in for the charm that records which operations ran
#[derive(Default)]
struct RecordingCharm {
    calls: RefCell<Vec<&'static str>>,
}

impl Lifecycle for RecordingCharm {
    fn render_with_interfaces(&self, _interfaces: &Interfaces) -> Result<(), CharmError> {
        self.calls.borrow_mut().push("render");
        Ok(())
    }

    fn db_sync(&self) -> Result<(), CharmError> {
        self.calls.borrow_mut().push("db-sync");
        Ok(())
    }

    fn assess_status(&self, _active: &StateSet) -> Result<(), CharmError> {
        self.calls.borrow_mut().push("assess-status");
        Ok(())
    }
}

#[test]
fn configure_renders_syncs_then_assesses() {
    let charm = RecordingCharm::default();
    let ctx = HookContext::default();

    handlers::configure(&charm, &ctx).unwrap();

    assert_eq!(
        *charm.calls.borrow(),
        vec!["render", "db-sync", "assess-status"]
    );
}

#[test]
fn handler_waits_for_every_gating_state() {
    let fired = Rc::new(RefCell::new(0));
    let seen = fired.clone();

    let mut registry = Registry::new();
    registry.register(
        "needs-three",
        &["shared-db.available", "identity-service.available", "amqp.available"],
        &[],
        move |_charm, _ctx| {
            *seen.borrow_mut() += 1;
            Ok(())
        },
    );

    let mut ctx = HookContext::default();
    ctx.set("shared-db.available");
    ctx.set("identity-service.available");
    registry.dispatch(&mut ctx).unwrap();
    assert_eq!(*fired.borrow(), 0);

    ctx.set("amqp.available");
    registry.dispatch(&mut ctx).unwrap();
    assert_eq!(*fired.borrow(), 1);

    // the condition is a level, not an edge: still true, fires again
    registry.dispatch(&mut ctx).unwrap();
    assert_eq!(*fired.borrow(), 2);
}

#[test]
fn handler_fires_at_most_once_per_dispatch() {
    let fired = Rc::new(RefCell::new(0));
    let seen = fired.clone();

    let mut registry = Registry::new();
    registry.register("always", &[], &[], move |_charm, _ctx| {
        *seen.borrow_mut() += 1;
        Ok(())
    });

    let mut ctx = HookContext::default();
    registry.dispatch(&mut ctx).unwrap();
    assert_eq!(*fired.borrow(), 1);
}

#[test]
fn states_set_while_dispatching_trigger_later_handlers() {
    let order = Rc::new(RefCell::new(Vec::new()));

    let mut registry = Registry::new();
    let seen = order.clone();
    registry.register("install", &[], &["charm.installed"], move |_charm, ctx| {
        seen.borrow_mut().push("install");
        ctx.set("charm.installed");
        Ok(())
    });
    let seen = order.clone();
    registry.register("post-install", &["charm.installed"], &[], move |_charm, _ctx| {
        seen.borrow_mut().push("post-install");
        Ok(())
    });

    let mut ctx = HookContext::default();
    registry.dispatch(&mut ctx).unwrap();
    assert_eq!(*order.borrow(), vec!["install", "post-install"]);

    // a second hook skips the guarded handler but re-runs the level one
    registry.dispatch(&mut ctx).unwrap();
    assert_eq!(
        *order.borrow(),
        vec!["install", "post-install", "post-install"]
    );
}

#[test]
fn handler_errors_abort_the_dispatch() {
    let fired = Rc::new(RefCell::new(0));
    let seen = fired.clone();

    let mut registry = Registry::new();
    registry.register("failing", &[], &[], |_charm, _ctx| {
        Err(CharmError::UnknownHook("boom".to_string()))
    });
    registry.register("after", &[], &[], move |_charm, _ctx| {
        *seen.borrow_mut() += 1;
        Ok(())
    });

    let mut ctx = HookContext::default();
    assert!(registry.dispatch(&mut ctx).is_err());
    assert_eq!(*fired.borrow(), 0);
}

#[test]
fn context_roundtrips_through_the_state_dir() {
    let dir = tempfile::tempdir().unwrap();

    let mut ctx = HookContext::default();
    ctx.set("charm.installed");
    ctx.set("shared-db.connected");
    ctx.interfaces.shared_db = Some(DatabaseInterface {
        db_host: "10.5.0.11".to_string(),
        password: "sekrit".to_string(),
        allowed_units: None,
    });
    ctx.save_to(dir.path()).unwrap();

    let reloaded = HookContext::load_from(dir.path()).unwrap();
    assert_eq!(reloaded, ctx);
}

#[test]
fn departed_data_is_dropped_from_the_state_dir() {
    let dir = tempfile::tempdir().unwrap();

    let mut ctx = HookContext::default();
    ctx.interfaces.shared_db = Some(DatabaseInterface {
        db_host: "10.5.0.11".to_string(),
        password: "sekrit".to_string(),
        allowed_units: None,
    });
    ctx.save_to(dir.path()).unwrap();

    ctx.interfaces.discard("shared-db");
    ctx.save_to(dir.path()).unwrap();

    let reloaded = HookContext::load_from(dir.path()).unwrap();
    assert_eq!(reloaded.interfaces.shared_db, None);
}
