//! Consecutive duty day runs.

use chrono::{Days, NaiveDate};

use super::report::{Violation, ViolationKind};
use super::ValidationView;
use crate::domain::Person;

/// Flags every maximal run of consecutive on-duty days longer than the
/// cap.
pub(crate) fn check_consecutive_duty(
    view: &ValidationView<'_>,
    resident: &Person,
    cap: u32,
    violations: &mut Vec<Violation>,
) {
    let hours = view.duty_hours_by_date(resident.id());
    let mut duty_days: Vec<NaiveDate> = hours
        .iter()
        .filter(|&(_, &h)| h > 0.0)
        .map(|(&date, _)| date)
        .collect();
    duty_days.sort_unstable();

    let mut run_start: Option<NaiveDate> = None;
    let mut run_length: u32 = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in duty_days {
        let contiguous = previous.is_some_and(|p| p + Days::new(1) == date);
        if contiguous {
            run_length += 1;
        } else {
            flush_run(resident, run_start, run_length, cap, violations);
            run_start = Some(date);
            run_length = 1;
        }
        previous = Some(date);
    }
    flush_run(resident, run_start, run_length, cap, violations);
}

fn flush_run(
    resident: &Person,
    run_start: Option<NaiveDate>,
    run_length: u32,
    cap: u32,
    violations: &mut Vec<Violation>,
) {
    let Some(start) = run_start else {
        return;
    };
    if run_length > cap {
        violations.push(Violation {
            kind: ViolationKind::ConsecutiveDuty,
            severity: ViolationKind::ConsecutiveDuty.severity(),
            person_id: Some(resident.id().to_owned()),
            block_id: None,
            window_start: Some(start),
            message: format!(
                "{} works {run_length} consecutive days starting {start} (cap {cap})",
                resident.id()
            ),
            observed: f64::from(run_length),
            limit: f64::from(cap),
        });
    }
}
