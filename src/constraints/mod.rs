//! Pluggable constraint library.
//!
//! A constraint is a named rule with a weight: infinite weight makes it a
//! hard rule pruning candidates through [`SchedulingConstraint::propagate`],
//! finite weight makes it a soft rule contributing to the composite cost
//! through [`SchedulingConstraint::score`]. [`ConstraintManager`] owns an
//! ordered, name-keyed set of rules and exposes filtering and cost
//! evaluation to the solver backends.

pub mod error;
pub mod hard;
pub mod manager;
pub mod soft;
pub mod state;

pub use error::ConstraintError;
pub use manager::{ConstraintManager, DroppedCandidate, RuleConfig};
pub use state::ScheduleState;

use std::fmt::Debug;

use crate::Id;

/// A proposed (person, block, template) placement not yet committed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateSlot {
    pub person_id: Id,
    pub block_id: Id,
    pub template_id: Id,
}

impl CandidateSlot {
    pub fn new(
        person_id: impl Into<Id>,
        block_id: impl Into<Id>,
        template_id: impl Into<Id>,
    ) -> Self {
        Self {
            person_id: person_id.into(),
            block_id: block_id.into(),
            template_id: template_id.into(),
        }
    }
}

/// Outcome of hard propagation for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Forbidden(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// A single scheduling rule.
///
/// # Contract
///
/// Implementations must be deterministic for identical `(candidate,
/// state)` inputs and must not mutate anything through the state
/// reference. `propagate` is consulted for hard pruning; `score` returns
/// the marginal cost of placing the candidate (lower is better) and is
/// only meaningful for finite-weight rules.
pub trait SchedulingConstraint: Send + Sync + Debug {
    /// Stable name; part of the public contract (telemetry and the
    /// manager registry key on it).
    fn name(&self) -> &'static str;

    /// Nonnegative weight; `f64::INFINITY` marks a hard rule.
    fn weight(&self) -> f64;

    fn is_hard(&self) -> bool {
        self.weight().is_infinite()
    }

    fn propagate(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> Decision {
        let _ = (candidate, state);
        Decision::Allowed
    }

    fn score(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> f64 {
        let _ = (candidate, state);
        0.0
    }
}
