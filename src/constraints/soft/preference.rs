//! Rotation continuity.

use crate::constraints::{CandidateSlot, ScheduleState, SchedulingConstraint};

/// Rewards continuity with a person's recent rotation history.
///
/// Zero cost when the person worked the same template within the
/// lookback window, unit cost otherwise, so novel placements lose
/// tie-breaks against continuations.
#[derive(Debug, Clone, Copy)]
pub struct PreferenceTrail {
    weight: f64,
    lookback_days: u64,
}

impl PreferenceTrail {
    pub fn new(weight: f64, lookback_days: u64) -> Self {
        Self {
            weight,
            lookback_days,
        }
    }
}

impl SchedulingConstraint for PreferenceTrail {
    fn name(&self) -> &'static str {
        "preference_trail"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> f64 {
        let Some(block) = state.block(&candidate.block_id) else {
            return 0.0;
        };
        if state.recent_same_template(
            &candidate.person_id,
            &candidate.template_id,
            block.date(),
            self.lookback_days,
        ) {
            0.0
        } else {
            1.0
        }
    }
}
