//! Consecutive on-call ceiling.

use crate::constraints::{CandidateSlot, Decision, ScheduleState, SchedulingConstraint};

/// Caps the consecutive run of call half-days for any person.
///
/// Only templates tagged `"call"` count toward the run; adjacent means
/// AM→PM on one date and PM→next-day-AM across dates.
#[derive(Debug, Clone, Copy)]
pub struct MaxConsecutiveCallCap {
    cap: u32,
}

impl MaxConsecutiveCallCap {
    pub fn new(cap: u32) -> Self {
        Self { cap }
    }
}

impl SchedulingConstraint for MaxConsecutiveCallCap {
    fn name(&self) -> &'static str {
        "max_consecutive_call_cap"
    }

    fn weight(&self) -> f64 {
        f64::INFINITY
    }

    fn propagate(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> Decision {
        let (Some(block), Some(template)) = (
            state.block(&candidate.block_id),
            state.template(&candidate.template_id),
        ) else {
            return Decision::Allowed;
        };
        if !template.has_tag("call") {
            return Decision::Allowed;
        }
        let run = state.call_run_if_added(&candidate.person_id, block.date(), block.half());
        if run > self.cap {
            Decision::Forbidden(format!(
                "{} would reach {} consecutive call half-days (cap {})",
                candidate.person_id, run, self.cap
            ))
        } else {
            Decision::Allowed
        }
    }
}
