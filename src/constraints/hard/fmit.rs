//! Post-FMIT recovery rules.
//!
//! An FMIT (Family Medicine Inpatient Team) week runs Monday through
//! Friday. Two recovery rules apply to the faculty who served it: the
//! Friday of the *following* week is blocked from clinic, and the Sunday
//! straight after the FMIT week is blocked entirely.

use chrono::{Datelike, Days, Weekday};

use crate::constraints::state::monday_of;
use crate::constraints::{CandidateSlot, Decision, ScheduleState, SchedulingConstraint};
use crate::domain::ActivityType;

/// Blocks clinic on the Friday of the week after an FMIT week.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostFmitRecovery;

impl SchedulingConstraint for PostFmitRecovery {
    fn name(&self) -> &'static str {
        "post_fmit_recovery"
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
        if block.date().weekday() != Weekday::Fri
            || template.activity() != ActivityType::Outpatient
        {
            return Decision::Allowed;
        }
        let Some(weeks) = state.fmit_weeks(&candidate.person_id) else {
            return Decision::Allowed;
        };
        // The Friday after FMIT week w is in the week anchored at w + 7.
        let Some(fmit_monday) = monday_of(block.date()).checked_sub_days(Days::new(7)) else {
            return Decision::Allowed;
        };
        if weeks.contains(&fmit_monday) {
            Decision::Forbidden(format!(
                "{} is in post-FMIT recovery on {}",
                candidate.person_id,
                block.date()
            ))
        } else {
            Decision::Allowed
        }
    }
}

/// Blocks the Sunday immediately following an FMIT week.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostFmitSundayBlocking;

impl SchedulingConstraint for PostFmitSundayBlocking {
    fn name(&self) -> &'static str {
        "post_fmit_sunday_blocking"
    }

    fn weight(&self) -> f64 {
        f64::INFINITY
    }

    fn propagate(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> Decision {
        let Some(block) = state.block(&candidate.block_id) else {
            return Decision::Allowed;
        };
        if block.date().weekday() != Weekday::Sun {
            return Decision::Allowed;
        }
        let Some(weeks) = state.fmit_weeks(&candidate.person_id) else {
            return Decision::Allowed;
        };
        // Sunday belongs to the week it follows: same Monday anchor.
        if weeks.contains(&monday_of(block.date())) {
            Decision::Forbidden(format!(
                "{} is off the Sunday after an FMIT week ({})",
                candidate.person_id,
                block.date()
            ))
        } else {
            Decision::Allowed
        }
    }
}
