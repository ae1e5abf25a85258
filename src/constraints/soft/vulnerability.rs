//! N-1 vulnerability pressure.

use crate::constraints::{CandidateSlot, ScheduleState, SchedulingConstraint};

/// Penalizes placements that deepen dependence on scarce coverage.
///
/// The fewer eligible alternatives a template has, the more every
/// additional placement on it concentrates single-person risk: a
/// template with one eligible resident scores 1, one with many scores
/// near zero.
#[derive(Debug, Clone, Copy)]
pub struct N1Vulnerability {
    weight: f64,
}

impl N1Vulnerability {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl SchedulingConstraint for N1Vulnerability {
    fn name(&self) -> &'static str {
        "n1_vulnerability"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn score(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> f64 {
        match state.eligible_residents(&candidate.template_id) {
            0 | 1 => 1.0,
            alternatives => 1.0 / f64::from(alternatives - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityType, PgyLevel, RotationTemplate, RunIndex};
    use crate::test_utils::{clinic_template, half_day_blocks, resident};
    use chrono::NaiveDate;

    #[test]
    fn scarce_templates_cost_more() {
        let people = vec![
            resident("r1", PgyLevel::Pgy1).with_credential("sports_medicine"),
            resident("r2", PgyLevel::Pgy1),
            resident("r3", PgyLevel::Pgy1),
        ];
        let blocks = half_day_blocks(
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        );
        let templates = vec![
            clinic_template("clinic"),
            RotationTemplate::new("sports", "Sports Medicine", ActivityType::Outpatient)
                .requiring_credential("sports_medicine"),
        ];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &[]).unwrap();
        let state = ScheduleState::new(&index);

        let rule = N1Vulnerability::new(25.0);
        // Sole eligible resident: maximum pressure.
        let scarce = CandidateSlot::new("r1", blocks[0].id(), "sports");
        assert_eq!(rule.score(&scarce, &state), 1.0);
        // Three eligible: pressure drops to 1/(3-1).
        let plentiful = CandidateSlot::new("r1", blocks[0].id(), "clinic");
        assert!((rule.score(&plentiful, &state) - 0.5).abs() < 1e-12);
    }
}
