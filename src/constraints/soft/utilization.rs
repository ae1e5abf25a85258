//! Utilization headroom.

use crate::constraints::{CandidateSlot, ScheduleState, SchedulingConstraint};

/// Penalizes pushing a block's utilization past the queueing threshold.
///
/// Score is the excess of post-placement utilization over the threshold
/// (default 0.8), zero below it.
#[derive(Debug, Clone, Copy)]
pub struct UtilizationBuffer {
    weight: f64,
    threshold: f64,
}

impl UtilizationBuffer {
    pub fn new(weight: f64, threshold: f64) -> Self {
        Self { weight, threshold }
    }
}

impl SchedulingConstraint for UtilizationBuffer {
    fn name(&self) -> &'static str {
        "utilization_buffer"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> f64 {
        (state.utilization_after_adding(&candidate.block_id) - self.threshold).max(0.0)
    }
}
