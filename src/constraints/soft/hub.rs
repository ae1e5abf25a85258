//! Hub protection.

use crate::constraints::{CandidateSlot, ScheduleState, SchedulingConstraint};

/// Penalizes piling work on people who are already coverage hubs.
///
/// A person's hub-ness is their degree centrality in the coverage graph
/// (people sharing eligibility for a solver-managed template). Above the
/// configured threshold the centrality itself becomes the score, so the
/// most central people draw the largest penalty.
#[derive(Debug, Clone, Copy)]
pub struct HubProtection {
    weight: f64,
    threshold: f64,
}

impl HubProtection {
    pub fn new(weight: f64, threshold: f64) -> Self {
        Self { weight, threshold }
    }
}

impl SchedulingConstraint for HubProtection {
    fn name(&self) -> &'static str {
        "hub_protection"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> f64 {
        let centrality = state.centrality(&candidate.person_id);
        if centrality >= self.threshold {
            centrality
        } else {
            0.0
        }
    }
}
