//! CP-SAT backend: linear 0/1 model over an external solver interface.
//!
//! The backend builds decision variables `x[p,b,t] ∈ {0,1}` for the
//! filtered candidates, linear hard constraints mirroring the rule set,
//! and a penalized objective carrying the soft costs plus a coverage
//! reward. The actual search runs behind [`CpModelSolver`]; no solver
//! library is prescribed and a backend without one reports
//! [`BackendError::Unavailable`], which the pipeline answers with the
//! greedy fallback.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use super::error::BackendError;
use super::{BackendOutcome, SolverBackend};
use crate::constraints::{CandidateSlot, ConstraintManager, ScheduleState};
use crate::sink::{Clock, RunBudget};

/// Bonus per placed assignment in the objective; dominates any soft
/// penalty so the solver prefers coverage over idleness.
const COVERAGE_REWARD: f64 = 1_000.0;

/// Linear constraint `lower ≤ Σ coefᵢ·xᵢ ≤ upper`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub terms: Vec<(usize, i64)>,
    pub lower: i64,
    pub upper: i64,
}

/// 0/1 integer model handed to the external solver.
#[derive(Debug, Clone, PartialEq)]
pub struct CpModel {
    /// One decision variable per candidate, in candidate order.
    pub variables: Vec<CandidateSlot>,
    pub constraints: Vec<LinearConstraint>,
    /// Objective coefficients to minimize, one per variable.
    pub objective: Vec<f64>,
}

/// Assignment values returned by the external solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpSolution {
    pub values: Vec<bool>,
    pub feasible: bool,
    pub proven_infeasible: bool,
}

/// External constraint-programming solver boundary.
pub trait CpModelSolver: Debug + Send + Sync {
    fn solve(
        &self,
        model: &CpModel,
        budget: &RunBudget,
        clock: &dyn Clock,
    ) -> Result<CpSolution, BackendError>;
}

/// CP-SAT style backend.
#[derive(Debug)]
pub struct CpSatBackend {
    solver: Option<Arc<dyn CpModelSolver>>,
}

impl CpSatBackend {
    pub fn new(solver: Arc<dyn CpModelSolver>) -> Self {
        Self {
            solver: Some(solver),
        }
    }

    /// A backend with no solver wired in; always fails over to greedy.
    pub fn unavailable() -> Self {
        Self { solver: None }
    }

    /// Builds the 0/1 model for the candidate set against the current
    /// state: per-(person, block) exclusivity, per-(block, template)
    /// headcount ceilings, and a soft-cost-minus-coverage objective.
    fn build_model(
        candidates: &[CandidateSlot],
        state: &ScheduleState<'_>,
        manager: &ConstraintManager,
    ) -> CpModel {
        let mut by_person_block: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
        let mut by_block_template: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
        for (i, candidate) in candidates.iter().enumerate() {
            by_person_block
                .entry((candidate.person_id.as_str(), candidate.block_id.as_str()))
                .or_default()
                .push(i);
            by_block_template
                .entry((candidate.block_id.as_str(), candidate.template_id.as_str()))
                .or_default()
                .push(i);
        }

        let mut constraints = Vec::new();
        let mut keys: Vec<&(&str, &str)> = by_person_block.keys().collect();
        keys.sort();
        for key in keys {
            constraints.push(LinearConstraint {
                terms: by_person_block[key].iter().map(|&i| (i, 1)).collect(),
                lower: 0,
                upper: 1,
            });
        }
        let mut keys: Vec<&(&str, &str)> = by_block_template.keys().collect();
        keys.sort();
        for key in keys {
            let headroom = state
                .template(key.1)
                .map(|t| {
                    i64::from(t.max_headcount().min(1_000_000))
                        - i64::from(state.resident_count_on(key.0, key.1))
                })
                .unwrap_or(0)
                .max(0);
            constraints.push(LinearConstraint {
                terms: by_block_template[key].iter().map(|&i| (i, 1)).collect(),
                lower: 0,
                upper: headroom,
            });
        }

        let objective = candidates
            .iter()
            .map(|c| manager.cost(c, state) - COVERAGE_REWARD)
            .collect();

        CpModel {
            variables: candidates.to_vec(),
            constraints,
            objective,
        }
    }
}

impl SolverBackend for CpSatBackend {
    fn name(&self) -> &'static str {
        "cp_sat"
    }

    fn solve(
        &self,
        candidates: &[CandidateSlot],
        state: &mut ScheduleState<'_>,
        manager: &ConstraintManager,
        budget: &RunBudget,
        clock: &dyn Clock,
    ) -> Result<BackendOutcome, BackendError> {
        let Some(solver) = &self.solver else {
            return Err(BackendError::Unavailable(
                "no constraint-programming solver configured".into(),
            ));
        };

        let model = Self::build_model(candidates, state, manager);
        let solution = solver.solve(&model, budget, clock)?;

        if solution.proven_infeasible {
            let mut outcome = BackendOutcome::empty();
            outcome.proven_infeasible = true;
            return Ok(outcome);
        }
        if !solution.feasible {
            return Err(BackendError::Internal(
                "solver returned no feasible assignment".into(),
            ));
        }
        if solution.values.len() != candidates.len() {
            return Err(BackendError::Internal(format!(
                "solver returned {} values for {} variables",
                solution.values.len(),
                candidates.len()
            )));
        }

        // Commit the selection through full propagation; linear models
        // approximate the non-linear rules, so each placement is
        // re-checked before it lands.
        let mut outcome = BackendOutcome::empty();
        for (i, candidate) in candidates.iter().enumerate() {
            if !solution.values[i] {
                continue;
            }
            if let Some(stop) = budget.check(clock) {
                outcome.stop = Some(stop);
                break;
            }
            if manager.propagate(candidate, state).is_allowed() {
                outcome.cost += manager.cost(candidate, state);
                state.place(candidate);
                outcome.selected.push(candidate.clone());
            }
            outcome.iterations += 1;
        }
        Ok(outcome)
    }
}
