//! Level-triggered dispatch of lifecycle handlers.
//!
//! Handlers are gated on named states. On every hook the whole registry is
//! re-evaluated against the current state set; a handler fires whenever its
//! condition holds, at most once per hook, and dispatch loops until no
//! further handler matches.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use ex::fs::{create_dir_all, read, write};
use log::debug;
use serde_yaml::{from_slice, to_vec};

use crate::charm::{self, SenlinCharm};
use crate::error::CharmError;
use crate::interfaces::Interfaces;
use crate::paths;

pub type StateSet = BTreeSet<String>;

/// Everything a handler can see while a hook runs: the active states and
/// the relation data behind them. Persisted between hooks in the state dir.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookContext {
    pub states: StateSet,
    pub interfaces: Interfaces,
}

impl HookContext {
    pub fn load() -> Result<Self, CharmError> {
        Self::load_from(&paths::state_dir())
    }

    pub fn load_from(dir: &Path) -> Result<Self, CharmError> {
        let states = read(dir.join("states.yaml"))
            .map(|bytes| from_slice(&bytes))
            .unwrap_or_else(|_| Ok(StateSet::new()))?;
        let interfaces = Interfaces::load_from(&dir.join("interfaces"))?;

        Ok(Self { states, interfaces })
    }

    pub fn save(&self) -> Result<(), CharmError> {
        self.save_to(&paths::state_dir())
    }

    pub fn save_to(&self, dir: &Path) -> Result<(), CharmError> {
        create_dir_all(dir)?;
        write(dir.join("states.yaml"), to_vec(&self.states)?)?;
        self.interfaces.save_to(&dir.join("interfaces"))
    }

    pub fn set(&mut self, state: &str) {
        self.states.insert(state.to_string());
    }

    pub fn remove(&mut self, state: &str) {
        self.states.remove(state);
    }

    pub fn active(&self, state: &str) -> bool {
        self.states.contains(state)
    }
}

type HandlerFn = Box<dyn Fn(&mut SenlinCharm, &mut HookContext) -> Result<(), CharmError>>;

struct Handler {
    name: String,
    when: Vec<String>,
    when_not: Vec<String>,
    func: HandlerFn,
}

impl Handler {
    fn matches(&self, states: &StateSet) -> bool {
        self.when.iter().all(|state| states.contains(state))
            && self.when_not.iter().all(|state| !states.contains(state))
    }
}

/// The registered handlers, in registration order. Registration happens
/// once at startup; the set never changes afterwards.
#[derive(Default)]
pub struct Registry {
    handlers: Vec<Handler>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, when: &[&str], when_not: &[&str], func: F)
    where
        F: Fn(&mut SenlinCharm, &mut HookContext) -> Result<(), CharmError> + 'static,
    {
        self.handlers.push(Handler {
            name: name.to_string(),
            when: when.iter().map(|s| s.to_string()).collect(),
            when_not: when_not.iter().map(|s| s.to_string()).collect(),
            func: Box::new(func),
        });
    }

    /// Run every handler whose condition currently holds.
    ///
    /// The state set is re-checked after each handler, so states set while
    /// dispatching can bring further handlers in during the same hook. The
    /// charm instance is acquired around each callback and released before
    /// the next evaluation. The first handler error aborts the dispatch.
    pub fn dispatch(&self, ctx: &mut HookContext) -> Result<(), CharmError> {
        let mut fired: HashSet<&str> = HashSet::new();

        loop {
            let handler = self
                .handlers
                .iter()
                .find(|h| !fired.contains(h.name.as_str()) && h.matches(&ctx.states));

            let handler = match handler {
                Some(handler) => handler,
                None => break,
            };

            fired.insert(handler.name.as_str());
            debug!("invoking handler {}", handler.name);

            let mut instance = charm::provide_charm_instance();
            (handler.func)(&mut instance, ctx)?;
        }

        Ok(())
    }
}
