//! Inpatient coverage protection.

use crate::constraints::{CandidateSlot, Decision, ScheduleState, SchedulingConstraint};

/// Keeps residents on their preserved inpatient days.
///
/// A resident with preserved inpatient duty on a date cannot take a
/// solver-managed assignment on either half of that date; pulling them
/// into clinic would break the block's required inpatient headcount.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResidentInpatientHeadcount;

impl SchedulingConstraint for ResidentInpatientHeadcount {
    fn name(&self) -> &'static str {
        "resident_inpatient_headcount"
    }

    fn weight(&self) -> f64 {
        f64::INFINITY
    }

    fn propagate(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> Decision {
        let Some(block) = state.block(&candidate.block_id) else {
            return Decision::Allowed;
        };
        if state.has_inpatient_on(&candidate.person_id, block.date()) {
            Decision::Forbidden(format!(
                "{} covers inpatient on {}",
                candidate.person_id,
                block.date()
            ))
        } else {
            Decision::Allowed
        }
    }
}
