//! Deterministic greedy sweep backend.

use super::error::BackendError;
use super::{BackendOutcome, SolverBackend};
use crate::constraints::{CandidateSlot, ConstraintManager, ScheduleState};
use crate::sink::{Clock, RunBudget};

/// Fills slots in candidate order: blocks in time order, templates in
/// priority order, picking the allowed candidate with the lowest
/// weighted cost at every step.
///
/// No backtracking, no randomness; the seed is ignored. Ties on cost
/// break by person id, then template id, so identical inputs always
/// produce the identical selection. Used directly, as the fallback for
/// failing backends, and as the seed for min-conflicts.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyBackend;

impl SolverBackend for GreedyBackend {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(
        &self,
        candidates: &[CandidateSlot],
        state: &mut ScheduleState<'_>,
        manager: &ConstraintManager,
        budget: &RunBudget,
        clock: &dyn Clock,
    ) -> Result<BackendOutcome, BackendError> {
        let mut outcome = BackendOutcome::empty();

        for group in slot_groups(candidates) {
            let Some(first) = group.first() else {
                continue;
            };
            let Some(template) = state.template(&first.template_id) else {
                continue;
            };
            let target = template.min_residents();

            loop {
                if let Some(stop) = budget.check(clock) {
                    outcome.stop = Some(stop);
                    return Ok(outcome);
                }
                if state.resident_count_on(&first.block_id, &first.template_id) >= target {
                    break;
                }

                let mut best: Option<(f64, &CandidateSlot)> = None;
                for candidate in group {
                    if !manager.propagate(candidate, state).is_allowed() {
                        continue;
                    }
                    let cost = manager.cost(candidate, state);
                    let better = match &best {
                        None => true,
                        Some((best_cost, best_slot)) => {
                            match cost.total_cmp(best_cost) {
                                std::cmp::Ordering::Less => true,
                                std::cmp::Ordering::Greater => false,
                                std::cmp::Ordering::Equal => {
                                    (candidate.person_id.as_str(), candidate.template_id.as_str())
                                        < (best_slot.person_id.as_str(), best_slot.template_id.as_str())
                                }
                            }
                        }
                    };
                    if better {
                        best = Some((cost, candidate));
                    }
                }

                match best {
                    Some((cost, slot)) => {
                        state.place(slot);
                        outcome.selected.push(slot.clone());
                        outcome.cost += cost;
                        outcome.iterations += 1;
                    }
                    None => break, // slot stays uncovered
                }
            }
        }

        Ok(outcome)
    }
}

/// Splits the ordered candidate list into consecutive (block, template)
/// groups. Candidate generation emits groups contiguously, so a single
/// forward scan suffices.
fn slot_groups(candidates: &[CandidateSlot]) -> impl Iterator<Item = &[CandidateSlot]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..=candidates.len() {
        let boundary = i == candidates.len()
            || candidates[i].block_id != candidates[start].block_id
            || candidates[i].template_id != candidates[start].template_id;
        if boundary {
            groups.push(&candidates[start..i]);
            start = i;
        }
    }
    groups.into_iter()
}
