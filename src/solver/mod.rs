//! Solver pipeline: candidate generation, backends, orchestration.
//!
//! The pipeline turns a [`SchedulingContext`] into a
//! [`SchedulingResult`] through fixed stages: candidate slot loading,
//! preserved-map classification, candidate filtering, hard propagation,
//! backend invocation, preserved-conflict re-check, greedy supervision
//! assignment, and result emission. Backends are pluggable behind
//! [`SolverBackend`]; a failing backend falls back to greedy.

pub mod candidates;
pub mod config;
pub mod context;
pub mod cpsat;
pub mod error;
pub mod greedy;
pub mod min_conflicts;
pub mod pipeline;
pub mod result;
pub mod supervision;

pub use config::{Algorithm, SolveConfig};
pub use context::SchedulingContext;
pub use cpsat::{CpModel, CpModelSolver, CpSatBackend, CpSolution, LinearConstraint};
pub use error::BackendError;
pub use greedy::GreedyBackend;
pub use min_conflicts::MinConflictsBackend;
pub use pipeline::Pipeline;
pub use result::{SchedulingResult, SolveStatus, SolverStats};

use std::fmt::Debug;

use crate::constraints::{CandidateSlot, ConstraintManager, ScheduleState};
use crate::sink::{BudgetStop, Clock, RunBudget};

/// What a backend hands back to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendOutcome {
    /// Accepted placements, already committed into the state the
    /// backend was given.
    pub selected: Vec<CandidateSlot>,
    /// Weighted soft cost of the selection.
    pub cost: f64,
    pub iterations: u64,
    /// The backend proved no solution exists under the hard rules.
    pub proven_infeasible: bool,
    /// Set when the budget ended the search early.
    pub stop: Option<BudgetStop>,
}

impl BackendOutcome {
    pub fn empty() -> Self {
        Self {
            selected: Vec::new(),
            cost: 0.0,
            iterations: 0,
            proven_infeasible: false,
            stop: None,
        }
    }
}

/// A solver backend.
///
/// # Contract
///
/// - deterministic output for identical `(candidates, state, seed)`
/// - polls the budget between iterations and returns promptly with
///   `stop` set when it fires
/// - commits accepted placements into the given state via
///   [`ScheduleState::place`] so constraint evaluation sees them
pub trait SolverBackend: Debug {
    /// Stable backend name; part of the diagnostics contract.
    fn name(&self) -> &'static str;

    fn solve(
        &self,
        candidates: &[CandidateSlot],
        state: &mut ScheduleState<'_>,
        manager: &ConstraintManager,
        budget: &RunBudget,
        clock: &dyn Clock,
    ) -> Result<BackendOutcome, BackendError>;
}
