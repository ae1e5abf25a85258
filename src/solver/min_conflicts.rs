//! Min-conflicts repair backend.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::BackendError;
use super::greedy::GreedyBackend;
use super::{BackendOutcome, SolverBackend};
use crate::constraints::{CandidateSlot, ConstraintManager, ScheduleState};
use crate::sink::{Clock, RunBudget};

/// Starts from the greedy seed and repairs it with bounded random
/// reassignment steps.
///
/// Each step picks a random placed assignment, evaluates the allowed
/// alternatives for its (block, template) slot, and keeps the cheapest
/// one (strict improvement only). Terminates on zero residual cost or
/// when the step budget runs out. Randomness comes exclusively from the
/// caller-provided seed, so identical inputs and seeds reproduce the
/// identical schedule.
#[derive(Debug, Clone, Copy)]
pub struct MinConflictsBackend {
    seed: u64,
    steps: u32,
}

impl MinConflictsBackend {
    pub fn new(seed: u64, steps: u32) -> Self {
        Self { seed, steps }
    }
}

impl SolverBackend for MinConflictsBackend {
    fn name(&self) -> &'static str {
        "min_conflicts"
    }

    fn solve(
        &self,
        candidates: &[CandidateSlot],
        state: &mut ScheduleState<'_>,
        manager: &ConstraintManager,
        budget: &RunBudget,
        clock: &dyn Clock,
    ) -> Result<BackendOutcome, BackendError> {
        let mut outcome = GreedyBackend.solve(candidates, state, manager, budget, clock)?;
        if outcome.stop.is_some() || outcome.selected.is_empty() {
            return Ok(outcome);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);

        for _ in 0..self.steps {
            if let Some(stop) = budget.check(clock) {
                outcome.stop = Some(stop);
                break;
            }

            // Residual cost of the current selection; nothing left to
            // repair once it reaches zero.
            let residual: f64 = selection_cost(&outcome.selected, state, manager);
            if residual <= f64::EPSILON {
                break;
            }

            let victim_index = rng.gen_range(0..outcome.selected.len());
            let victim = outcome.selected[victim_index].clone();

            state.unplace(&victim);
            let current_cost = if manager.propagate(&victim, state).is_allowed() {
                manager.cost(&victim, state)
            } else {
                f64::INFINITY
            };

            let mut best: Option<(f64, &CandidateSlot)> = None;
            for candidate in candidates {
                if candidate.block_id != victim.block_id
                    || candidate.template_id != victim.template_id
                {
                    continue;
                }
                if !manager.propagate(candidate, state).is_allowed() {
                    continue;
                }
                let cost = manager.cost(candidate, state);
                let better = match &best {
                    None => true,
                    Some((best_cost, best_slot)) => match cost.total_cmp(best_cost) {
                        std::cmp::Ordering::Less => true,
                        std::cmp::Ordering::Greater => false,
                        std::cmp::Ordering::Equal => {
                            candidate.person_id < best_slot.person_id
                        }
                    },
                };
                if better {
                    best = Some((cost, candidate));
                }
            }

            outcome.iterations += 1;
            match best {
                Some((cost, replacement)) if cost + f64::EPSILON < current_cost => {
                    state.place(replacement);
                    outcome.selected[victim_index] = replacement.clone();
                }
                _ => {
                    // No strict improvement: restore the victim.
                    state.place(&victim);
                }
            }
        }

        outcome.cost = selection_cost(&outcome.selected, state, manager);
        Ok(outcome)
    }
}

/// Sum of marginal costs of the selection, each evaluated with the slot
/// lifted out of the state.
fn selection_cost(
    selected: &[CandidateSlot],
    state: &mut ScheduleState<'_>,
    manager: &ConstraintManager,
) -> f64 {
    let mut total = 0.0;
    for slot in selected {
        state.unplace(slot);
        total += manager.cost(slot, state);
        state.place(slot);
    }
    total
}
