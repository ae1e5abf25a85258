//! Duty-hour rules: the 80-hour average and one-day-off-in-seven.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use qtty::{Hour, Quantity};

use super::report::{Violation, ViolationKind};
use super::ValidationView;
use crate::domain::Person;

/// Hours one productive half-day block counts for.
pub fn block_hours() -> Quantity<Hour> {
    Quantity::new(4.0)
}

/// Productive duty hours per date for one person. Educational, absence,
/// off, and recovery blocks contribute nothing.
pub(crate) fn hours_by_date(view: &ValidationView<'_>, person_id: &str) -> HashMap<NaiveDate, f64> {
    let mut hours: HashMap<NaiveDate, Quantity<Hour>> = HashMap::new();
    for assignment in view.assignments_of(person_id) {
        let (Some(block), Some(template)) = (
            view.block(assignment.block_id()),
            view.template(assignment.template_id()),
        ) else {
            continue;
        };
        if !template.activity().is_productive() {
            continue;
        }
        let entry = hours.entry(block.date()).or_insert_with(|| Quantity::new(0.0));
        *entry = *entry + block_hours();
    }
    hours.into_iter().map(|(date, q)| (date, q.value())).collect()
}

/// 80-hour rule: for every 4-week window anchored at each week boundary
/// of the schedule window, the average weekly hours must stay at or
/// under the limit. Every failing window is reported; the check never
/// stops at a resident's first violation.
pub(crate) fn check_eighty_hour(
    view: &ValidationView<'_>,
    resident: &Person,
    weekly_limit: f64,
    violations: &mut Vec<Violation>,
) {
    let hours = hours_by_date(view, resident.id());
    let window = view.window;

    let mut anchor = window.start();
    while anchor + Days::new(27) <= window.end() {
        let mut total = 0.0;
        for offset in 0..28u64 {
            let day = anchor + Days::new(offset);
            total += hours.get(&day).copied().unwrap_or(0.0);
        }
        let weekly_average = total / 4.0;
        if weekly_average > weekly_limit {
            violations.push(Violation {
                kind: ViolationKind::EightyHour,
                severity: ViolationKind::EightyHour.severity(),
                person_id: Some(resident.id().to_owned()),
                block_id: None,
                window_start: Some(anchor),
                message: format!(
                    "{} averages {weekly_average:.1} h/week over the 4 weeks from {anchor} (limit {weekly_limit})",
                    resident.id()
                ),
                observed: weekly_average,
                limit: weekly_limit,
            });
        }
        anchor = anchor + Days::new(7);
    }
}

/// 1-in-7 rule: every rolling 7-day window anchored at each day of the
/// schedule window must contain at least one day with zero assigned
/// hours.
pub(crate) fn check_one_in_seven(
    view: &ValidationView<'_>,
    resident: &Person,
    violations: &mut Vec<Violation>,
) {
    let hours = hours_by_date(view, resident.id());
    let window = view.window;

    let mut anchor = window.start();
    while anchor + Days::new(6) <= window.end() {
        let worked_all = (0..7u64).all(|offset| {
            hours
                .get(&(anchor + Days::new(offset)))
                .is_some_and(|&h| h > 0.0)
        });
        if worked_all {
            violations.push(Violation {
                kind: ViolationKind::OneInSeven,
                severity: ViolationKind::OneInSeven.severity(),
                person_id: Some(resident.id().to_owned()),
                block_id: None,
                window_start: Some(anchor),
                message: format!(
                    "{} has no day off in the 7 days from {anchor}",
                    resident.id()
                ),
                observed: 7.0,
                limit: 6.0,
            });
        }
        anchor = anchor + Days::new(1);
    }
}
