//! Workload status, computed from which relation states are active.

use crate::reactive::StateSet;

/// Workload states the agent understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadState {
    Active,
    Blocked,
    Maintenance,
    Waiting,
}

impl From<WorkloadState> for &str {
    fn from(state: WorkloadState) -> &'static str {
        match state {
            WorkloadState::Active => "active",
            WorkloadState::Blocked => "blocked",
            WorkloadState::Maintenance => "maintenance",
            WorkloadState::Waiting => "waiting",
        }
    }
}

/// A state that must be active for the unit to be ready, and what to
/// report when it is not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCheck {
    pub state: String,
    pub err_status: WorkloadState,
    pub message: String,
}

/// The checks for a set of mandatory relations, in relation order.
///
/// A relation that never connected is a blocker; one that connected but
/// has not yet provided complete data is only worth waiting on.
pub fn states_to_check(relations: &[String]) -> Vec<(String, Vec<StateCheck>)> {
    relations
        .iter()
        .map(|relation| {
            (
                relation.clone(),
                vec![
                    StateCheck {
                        state: format!("{}.connected", relation),
                        err_status: WorkloadState::Blocked,
                        message: format!("'{}' missing", relation),
                    },
                    StateCheck {
                        state: format!("{}.available", relation),
                        err_status: WorkloadState::Waiting,
                        message: format!("'{}' incomplete", relation),
                    },
                ],
            )
        })
        .collect()
}

/// The first failing check decides the unit's status
pub fn assess(
    checks: &[(String, Vec<StateCheck>)],
    active: &StateSet,
) -> (WorkloadState, String) {
    for (_, relation_checks) in checks {
        for check in relation_checks {
            if !active.contains(&check.state) {
                return (check.err_status, check.message.clone());
            }
        }
    }
    (WorkloadState::Active, "Unit is ready".to_string())
}
