//! Per-block supervision ratio check.

use std::collections::HashMap;

use super::report::{Violation, ViolationKind};
use super::ValidationView;
use crate::domain::Block;

/// Requires `faculty ≥ ⌈residents / max_ratio⌉` on every block carrying
/// residents on a supervision-required template. One critical violation
/// per offending (block, template).
pub(crate) fn check_block_supervision(
    view: &ValidationView<'_>,
    block: &Block,
    violations: &mut Vec<Violation>,
) {
    let mut residents: HashMap<&str, u32> = HashMap::new();
    let mut faculty: HashMap<&str, u32> = HashMap::new();

    for assignment in view.assignments_on(block.id()) {
        let Some(person) = view.person(assignment.person_id()) else {
            continue;
        };
        let bucket = if person.is_resident() {
            &mut residents
        } else {
            &mut faculty
        };
        *bucket.entry(assignment.template_id()).or_default() += 1;
    }

    let mut template_ids: Vec<&str> = residents.keys().copied().collect();
    template_ids.sort_unstable();

    for template_id in template_ids {
        let Some(template) = view.template(template_id) else {
            continue;
        };
        let Some(rule) = template.supervision() else {
            continue;
        };
        let resident_count = residents[template_id];
        let ratio = rule.max_residents_per_faculty.max(1);
        let required = resident_count.div_ceil(ratio);
        let present = faculty.get(template_id).copied().unwrap_or(0);

        if present < required {
            violations.push(Violation {
                kind: ViolationKind::SupervisionRatio,
                severity: ViolationKind::SupervisionRatio.severity(),
                person_id: None,
                block_id: Some(block.id().to_owned()),
                window_start: Some(block.date()),
                message: format!(
                    "block {} has {resident_count} residents on {} with {present} supervising faculty ({required} required)",
                    block.id(),
                    template.name()
                ),
                observed: f64::from(present),
                limit: f64::from(required),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ActivityType, Assignment, DateWindow, Person, PgyLevel, Role, RotationTemplate,
    };
    use crate::test_utils::{half_day_blocks, resident};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn understaffed_block_flagged_once() {
        let people = vec![
            resident("r1", PgyLevel::Pgy1),
            resident("r2", PgyLevel::Pgy1),
            Person::faculty("f1", "F1"),
        ];
        let blocks = half_day_blocks(date(2), date(2));
        let templates = vec![
            RotationTemplate::new("clinic", "Clinic", ActivityType::Outpatient).supervised(1),
        ];
        // Two residents, ratio one-to-one, a single supervising faculty.
        let assignments = vec![
            Assignment::new("a1", "r1", blocks[0].id(), "clinic", Role::Primary),
            Assignment::new("a2", "r2", blocks[0].id(), "clinic", Role::Primary),
            Assignment::new("a3", "f1", blocks[0].id(), "clinic", Role::Supervising),
        ];
        let window = DateWindow::new(date(2), date(2)).unwrap();
        let view = ValidationView::new(&people, &blocks, &templates, &assignments, window);

        let mut violations = Vec::new();
        check_block_supervision(&view, &blocks[0], &mut violations);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::SupervisionRatio);
        assert_eq!(violations[0].observed, 1.0);
        assert_eq!(violations[0].limit, 2.0);
    }

    #[test]
    fn adequately_staffed_block_is_silent() {
        let people = vec![resident("r1", PgyLevel::Pgy1), Person::faculty("f1", "F1")];
        let blocks = half_day_blocks(date(2), date(2));
        let templates = vec![
            RotationTemplate::new("clinic", "Clinic", ActivityType::Outpatient).supervised(4),
        ];
        let assignments = vec![
            Assignment::new("a1", "r1", blocks[0].id(), "clinic", Role::Primary),
            Assignment::new("a2", "f1", blocks[0].id(), "clinic", Role::Supervising),
        ];
        let window = DateWindow::new(date(2), date(2)).unwrap();
        let view = ValidationView::new(&people, &blocks, &templates, &assignments, window);

        let mut violations = Vec::new();
        check_block_supervision(&view, &blocks[0], &mut violations);
        assert!(violations.is_empty());
    }
}
