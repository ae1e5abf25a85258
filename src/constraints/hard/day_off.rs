//! ACGME one-day-off-in-seven.

use chrono::Days;

use crate::constraints::{CandidateSlot, Decision, ScheduleState, SchedulingConstraint};

/// Keeps one workless day in every rolling 7-day window for residents.
///
/// A candidate is forbidden if its date would become the last free day
/// of any 7-day window containing it. Days the resident already works
/// never produce new full windows, so they pass straight through. The
/// validator re-checks the rule post-hoc over the full union.
#[derive(Debug, Default, Clone, Copy)]
pub struct OneDayOffIn7;

impl SchedulingConstraint for OneDayOffIn7 {
    fn name(&self) -> &'static str {
        "one_day_off_in_7"
    }

    fn weight(&self) -> f64 {
        f64::INFINITY
    }

    fn propagate(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> Decision {
        let (Some(person), Some(block)) = (
            state.person(&candidate.person_id),
            state.block(&candidate.block_id),
        ) else {
            return Decision::Allowed;
        };
        if !person.is_resident() {
            return Decision::Allowed;
        }
        let date = block.date();
        if state.has_productive_work(&candidate.person_id, date) {
            return Decision::Allowed;
        }

        for offset in 0..7u64 {
            let Some(start) = date.checked_sub_days(Days::new(offset)) else {
                continue;
            };
            let full = (0..7u64).all(|d| {
                let day = start + Days::new(d);
                day == date || state.has_productive_work(&candidate.person_id, day)
            });
            if full {
                return Decision::Forbidden(format!(
                    "{} would work all 7 days of the week starting {}",
                    candidate.person_id, start
                ));
            }
        }
        Decision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PgyLevel, RunIndex};
    use crate::test_utils::{clinic_template, half_day_blocks, resident};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn seventh_straight_day_forbidden() {
        let people = vec![resident("r1", PgyLevel::Pgy1)];
        let blocks = half_day_blocks(date(2), date(8));
        let templates = vec![clinic_template("clinic")];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &[]).unwrap();
        let mut state = ScheduleState::new(&index);

        // Work six straight days (AM blocks of 06-02 .. 06-07).
        for day in 2..=7u32 {
            let block = index.block_at(date(day), crate::domain::HalfDay::Am).unwrap();
            state.place(&CandidateSlot::new("r1", block.id(), "clinic"));
        }

        let seventh = index.block_at(date(8), crate::domain::HalfDay::Am).unwrap();
        let slot = CandidateSlot::new("r1", seventh.id(), "clinic");
        assert!(!OneDayOffIn7.propagate(&slot, &state).is_allowed());
    }

    #[test]
    fn sixth_day_still_allowed() {
        let people = vec![resident("r1", PgyLevel::Pgy1)];
        let blocks = half_day_blocks(date(2), date(8));
        let templates = vec![clinic_template("clinic")];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &[]).unwrap();
        let mut state = ScheduleState::new(&index);

        for day in 2..=6u32 {
            let block = index.block_at(date(day), crate::domain::HalfDay::Am).unwrap();
            state.place(&CandidateSlot::new("r1", block.id(), "clinic"));
        }

        let sixth = index.block_at(date(7), crate::domain::HalfDay::Am).unwrap();
        let slot = CandidateSlot::new("r1", sixth.id(), "clinic");
        assert!(OneDayOffIn7.propagate(&slot, &state).is_allowed());
    }

    #[test]
    fn second_half_of_working_day_allowed() {
        let people = vec![resident("r1", PgyLevel::Pgy1)];
        let blocks = half_day_blocks(date(2), date(8));
        let templates = vec![clinic_template("clinic")];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &[]).unwrap();
        let mut state = ScheduleState::new(&index);

        for day in 2..=8u32 {
            let block = index.block_at(date(day), crate::domain::HalfDay::Am).unwrap();
            if day < 8 {
                state.place(&CandidateSlot::new("r1", block.id(), "clinic"));
            }
        }
        // PM of an already-working day adds no new working day.
        let pm = index.block_at(date(4), crate::domain::HalfDay::Pm).unwrap();
        let slot = CandidateSlot::new("r1", pm.id(), "clinic");
        assert!(OneDayOffIn7.propagate(&slot, &state).is_allowed());
    }
}
