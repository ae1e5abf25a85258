//! Resident-to-faculty supervision feasibility.

use crate::constraints::{CandidateSlot, Decision, ScheduleState, SchedulingConstraint};

/// Forbids resident placements that could not be supervised.
///
/// Adding a resident to a supervision-required template must leave
/// `supervising + free eligible faculty ≥ ⌈residents / max_ratio⌉` on
/// the block. Faculty candidates never violate the ratio, so they pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct SupervisionRatio;

impl SchedulingConstraint for SupervisionRatio {
    fn name(&self) -> &'static str {
        "supervision_ratio"
    }

    fn weight(&self) -> f64 {
        f64::INFINITY
    }

    fn propagate(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> Decision {
        let (Some(person), Some(block), Some(template)) = (
            state.person(&candidate.person_id),
            state.block(&candidate.block_id),
            state.template(&candidate.template_id),
        ) else {
            return Decision::Allowed;
        };
        if !person.is_resident() {
            return Decision::Allowed;
        }
        let Some(rule) = template.supervision() else {
            return Decision::Allowed;
        };

        let residents_after = state.resident_count_on(&candidate.block_id, &candidate.template_id) + 1;
        let ratio = rule.max_residents_per_faculty.max(1);
        let required = residents_after.div_ceil(ratio);
        let supervising = state.supervisor_count_on(&candidate.block_id, &candidate.template_id);
        let free = state.available_supervisors(block, template).len() as u32;

        if supervising + free < required {
            Decision::Forbidden(format!(
                "no supervision capacity for {} residents on {} ({} required, {} reachable)",
                residents_after,
                template.name(),
                required,
                supervising + free
            ))
        } else {
            Decision::Allowed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityType, Person, PgyLevel, RotationTemplate, RunIndex};
    use crate::test_utils::{half_day_blocks, resident};
    use chrono::NaiveDate;

    #[test]
    fn forbids_when_no_faculty_reachable() {
        let people = vec![resident("r1", PgyLevel::Pgy1)];
        let blocks = half_day_blocks(
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        );
        let templates = vec![
            RotationTemplate::new("clinic", "Clinic", ActivityType::Outpatient).supervised(4),
        ];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &[]).unwrap();
        let state = ScheduleState::new(&index);

        let slot = CandidateSlot::new("r1", blocks[0].id(), "clinic");
        assert!(!SupervisionRatio.propagate(&slot, &state).is_allowed());
    }

    #[test]
    fn allows_within_ratio_with_free_faculty() {
        let people = vec![
            resident("r1", PgyLevel::Pgy1),
            resident("r2", PgyLevel::Pgy1),
            Person::faculty("f1", "F1"),
        ];
        let blocks = half_day_blocks(
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        );
        let templates = vec![
            RotationTemplate::new("clinic", "Clinic", ActivityType::Outpatient).supervised(4),
        ];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &[]).unwrap();
        let mut state = ScheduleState::new(&index);

        let first = CandidateSlot::new("r1", blocks[0].id(), "clinic");
        assert!(SupervisionRatio.propagate(&first, &state).is_allowed());
        state.place(&first);

        // One faculty supports up to four residents.
        let second = CandidateSlot::new("r2", blocks[0].id(), "clinic");
        assert!(SupervisionRatio.propagate(&second, &state).is_allowed());
    }
}
