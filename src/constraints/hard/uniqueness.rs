//! One half-day slot per person.

use crate::constraints::{CandidateSlot, Decision, ScheduleState, SchedulingConstraint};

/// Enforces (person, block) uniqueness across preserved and tentative
/// assignments.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueAssignmentPerBlock;

impl SchedulingConstraint for UniqueAssignmentPerBlock {
    fn name(&self) -> &'static str {
        "unique_assignment_per_block"
    }

    fn weight(&self) -> f64 {
        f64::INFINITY
    }

    fn propagate(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> Decision {
        if state.is_occupied(&candidate.person_id, &candidate.block_id) {
            Decision::Forbidden(format!(
                "{} already holds an assignment on block {}",
                candidate.person_id, candidate.block_id
            ))
        } else {
            Decision::Allowed
        }
    }
}
