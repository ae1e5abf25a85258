//! Zone boundary transitions.

use crate::constraints::{CandidateSlot, ScheduleState, SchedulingConstraint};

/// Penalizes same-day transitions between operational zones.
///
/// Fires when the candidate's template and the template occupying the
/// person's other half of the day both carry zones and they differ.
#[derive(Debug, Clone, Copy)]
pub struct ZoneBoundary {
    weight: f64,
}

impl ZoneBoundary {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl SchedulingConstraint for ZoneBoundary {
    fn name(&self) -> &'static str {
        "zone_boundary"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> f64 {
        let (Some(block), Some(template)) = (
            state.block(&candidate.block_id),
            state.template(&candidate.template_id),
        ) else {
            return 0.0;
        };
        let Some(zone) = template.zone() else {
            return 0.0;
        };
        let other = state.other_half_template(&candidate.person_id, block.date(), block.half());
        match other.and_then(|t| t.zone()) {
            Some(other_zone) if other_zone != zone => 1.0,
            _ => 0.0,
        }
    }
}
