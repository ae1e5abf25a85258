//! Load fairness within a PGY cohort.

use crate::constraints::{CandidateSlot, ScheduleState, SchedulingConstraint};

/// Penalizes loading a resident beyond the mean of their PGY peers.
///
/// Score is the excess of the person's post-placement load over the
/// cohort mean, zero at or below it. Faculty never score.
#[derive(Debug, Clone, Copy)]
pub struct FairnessByPgy {
    weight: f64,
}

impl FairnessByPgy {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl SchedulingConstraint for FairnessByPgy {
    fn name(&self) -> &'static str {
        "fairness_by_pgy"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> f64 {
        let Some(pgy) = state.person(&candidate.person_id).and_then(|p| p.pgy()) else {
            return 0.0;
        };
        let new_load = f64::from(state.load_of(&candidate.person_id) + 1);
        (new_load - state.pgy_peer_mean(pgy)).max(0.0)
    }
}
