//! No assignments during an absence.

use crate::constraints::{CandidateSlot, Decision, ScheduleState, SchedulingConstraint};

/// Forbids any assignment on a day the person is absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbsenceRespect;

impl SchedulingConstraint for AbsenceRespect {
    fn name(&self) -> &'static str {
        "absence_respect"
    }

    fn weight(&self) -> f64 {
        f64::INFINITY
    }

    fn propagate(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> Decision {
        let Some(block) = state.block(&candidate.block_id) else {
            return Decision::Allowed;
        };
        if state.is_absent(&candidate.person_id, block.date()) {
            Decision::Forbidden(format!(
                "{} is absent on {}",
                candidate.person_id,
                block.date()
            ))
        } else {
            Decision::Allowed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Absence, AbsenceKind, PgyLevel, RunIndex};
    use crate::test_utils::{clinic_template, half_day_blocks, resident};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn forbids_during_absence_only() {
        let people = vec![resident("r1", PgyLevel::Pgy1)];
        let blocks = half_day_blocks(date(2), date(3));
        let templates = vec![clinic_template("clinic")];
        let absences = vec![Absence::new("r1", date(2), date(2), AbsenceKind::Vacation).unwrap()];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &absences).unwrap();
        let state = ScheduleState::new(&index);

        let absent_day = CandidateSlot::new("r1", blocks[0].id(), "clinic");
        let next_day = CandidateSlot::new("r1", blocks[2].id(), "clinic");
        assert!(!AbsenceRespect.propagate(&absent_day, &state).is_allowed());
        assert!(AbsenceRespect.propagate(&next_day, &state).is_allowed());
    }
}
