//! Candidate slot generation: pipeline stages one through three.
//!
//! Stage ordering is a hard invariant: the preserved occupancy map (the
//! [`RunIndex`] built from existing assignments) exists before any
//! candidate filtering runs. Filtering against a half-built map drops
//! resident outpatient slots incorrectly when the resident's rotation
//! membership and their preserved assignments disagree.

use crate::constraints::CandidateSlot;
use crate::domain::{Block, Person, RotationTemplate, RunIndex};

/// Stage 1: one slot per (block, solver-managed template) active on the
/// block's date, in block-time order then template priority order
/// (higher first, id tie-break).
pub fn generate_slots<'a>(index: &RunIndex<'a>) -> Vec<(&'a Block, &'a RotationTemplate)> {
    let mut slots = Vec::new();
    for block in index.blocks_in_order() {
        let mut templates: Vec<&RotationTemplate> = index
            .templates()
            .iter()
            .filter(|t| t.is_solver_managed() && t.is_active_on(block.date()))
            .collect();
        templates.sort_by(|a, b| b.priority().cmp(&a.priority()).then_with(|| a.id().cmp(b.id())));
        for template in templates {
            slots.push((block, template));
        }
    }
    slots
}

/// Stages 2 + 3: expand slots to (person, block, template) candidates,
/// filtering through the preserved occupancy map.
///
/// A resident whose (person, block) is taken by any preserved
/// assignment — inpatient week, education day, absence placeholder —
/// never becomes a candidate for that block, regardless of what any
/// rotation membership table claims. People are visited in id order so
/// the candidate list is deterministic.
pub fn expand_candidates(
    index: &RunIndex<'_>,
    slots: &[(&Block, &RotationTemplate)],
) -> Vec<CandidateSlot> {
    let mut residents: Vec<&Person> = index.people().iter().filter(|p| p.is_resident()).collect();
    residents.sort_by_key(|p| p.id().to_owned());

    let mut candidates = Vec::new();
    for (block, template) in slots {
        for person in &residents {
            if index.is_occupied(person.id(), block.id()) {
                continue;
            }
            candidates.push(CandidateSlot::new(person.id(), block.id(), template.id()));
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityType, Assignment, PgyLevel, Role, RotationTemplate, RunIndex};
    use crate::test_utils::{clinic_template, half_day_blocks, resident, template};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    // ── generate_slots ────────────────────────────────────────────────

    #[test]
    fn slots_only_for_solver_managed_templates() {
        let people = vec![resident("r1", PgyLevel::Pgy1)];
        let blocks = half_day_blocks(date(2), date(2));
        let templates = vec![
            clinic_template("clinic"),
            template("ward", ActivityType::Inpatient),
            template("lecture", ActivityType::Education),
        ];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &[]).unwrap();

        let slots = generate_slots(&index);
        assert_eq!(slots.len(), 2); // clinic on AM and PM only
        assert!(slots.iter().all(|(_, t)| t.id() == "clinic"));
    }

    #[test]
    fn slots_ordered_by_block_then_priority() {
        let people = vec![resident("r1", PgyLevel::Pgy1)];
        let blocks = half_day_blocks(date(2), date(2));
        let templates = vec![
            clinic_template("clinic").with_priority(1),
            RotationTemplate::new("procs", "Procedure Clinic", ActivityType::Procedures)
                .with_priority(5),
        ];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &[]).unwrap();

        let slots = generate_slots(&index);
        let ids: Vec<&str> = slots.iter().map(|(_, t)| t.id()).collect();
        // Higher priority first within each block.
        assert_eq!(ids, vec!["procs", "clinic", "procs", "clinic"]);
    }

    #[test]
    fn weekend_restricted_template_emits_no_weekend_slots() {
        let people = vec![resident("r1", PgyLevel::Pgy1)];
        // 2025-06-06 Fri .. 2025-06-07 Sat.
        let blocks = half_day_blocks(date(6), date(7));
        let templates = vec![clinic_template("clinic").on_weekdays([
            chrono::Weekday::Mon,
            chrono::Weekday::Tue,
            chrono::Weekday::Wed,
            chrono::Weekday::Thu,
            chrono::Weekday::Fri,
        ])];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &[]).unwrap();

        let slots = generate_slots(&index);
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|(b, _)| b.date() == date(6)));
    }

    // ── expand_candidates ─────────────────────────────────────────────

    #[test]
    fn preserved_occupancy_suppresses_candidates() {
        // A resident with a preserved inpatient assignment on a block
        // gets no outpatient candidate there, regardless of rotation
        // membership tables.
        let people = vec![resident("r1", PgyLevel::Pgy1), resident("r2", PgyLevel::Pgy1)];
        let blocks = half_day_blocks(date(2), date(2));
        let templates = vec![
            clinic_template("clinic"),
            template("ward", ActivityType::Inpatient),
        ];
        let assignments =
            vec![Assignment::new("a1", "r1", blocks[0].id(), "ward", Role::Primary).preserved()];
        let index = RunIndex::build(&people, &blocks, &templates, &assignments, &[]).unwrap();

        let slots = generate_slots(&index);
        let candidates = expand_candidates(&index, &slots);

        assert!(!candidates
            .iter()
            .any(|c| c.person_id == "r1" && c.block_id == blocks[0].id()));
        // r1 is still a candidate for the free PM block.
        assert!(candidates
            .iter()
            .any(|c| c.person_id == "r1" && c.block_id == blocks[1].id()));
        // r2 is a candidate for both halves.
        assert_eq!(candidates.iter().filter(|c| c.person_id == "r2").count(), 2);
    }

    #[test]
    fn faculty_are_not_primary_candidates() {
        let people = vec![
            resident("r1", PgyLevel::Pgy1),
            crate::domain::Person::faculty("f1", "F1"),
        ];
        let blocks = half_day_blocks(date(2), date(2));
        let templates = vec![clinic_template("clinic")];
        let index = RunIndex::build(&people, &blocks, &templates, &[], &[]).unwrap();

        let candidates = expand_candidates(&index, &generate_slots(&index));
        assert!(candidates.iter().all(|c| c.person_id == "r1"));
    }
}
