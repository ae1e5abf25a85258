//! N-1 and N-2 contingency analysis.
//!
//! Removal simulations never mutate the schedule: backfill feasibility
//! runs through the constraint manager in propagation-only mode against
//! a read-only [`ScheduleState`] built over the same index.

use super::report::{PairResilience, PersonResilience};
use crate::constraints::{CandidateSlot, ConstraintManager, ScheduleState};
use crate::domain::{Assignment, Person, RunIndex};
use crate::sink::{Clock, RunBudget};
use crate::Id;

/// Whether anyone outside `removed` could absorb the assignment without
/// a new hard-rule violation.
fn backfillable(
    index: &RunIndex<'_>,
    state: &ScheduleState<'_>,
    manager: &ConstraintManager,
    assignment: &Assignment,
    removed: &[&str],
) -> bool {
    let (Some(owner), Some(block), Some(template)) = (
        index.person(assignment.person_id()),
        index.block(assignment.block_id()),
        index.template(assignment.template_id()),
    ) else {
        return true;
    };

    index.people().iter().any(|candidate| {
        if removed.contains(&candidate.id()) || candidate.id() == owner.id() {
            return false;
        }
        if candidate.kind() != owner.kind() || !template.accepts(candidate) {
            return false;
        }
        if index.is_occupied(candidate.id(), block.id())
            || index.is_absent(candidate.id(), block.date())
        {
            return false;
        }
        let slot = CandidateSlot::new(candidate.id(), block.id(), template.id());
        manager.propagate(&slot, state).is_allowed()
    })
}

/// Blocks a person covers, in (date, half) order.
fn covered_assignments<'a>(index: &RunIndex<'a>, person: &Person) -> Vec<&'a Assignment> {
    let mut covered: Vec<&Assignment> = index
        .assignments_for_person(person.id())
        .filter(|a| {
            index
                .template(a.template_id())
                .is_some_and(|t| t.activity().is_productive())
        })
        .collect();
    covered.sort_by_key(|a| index.block(a.block_id()).map(|b| b.key()));
    covered
}

/// N-1: per-person removal simulation.
///
/// Returns per-person scores in person-id order, or `None` as the
/// second element until truncation. Score = max(0, 1 −
/// uncoverable/covered); a person scoring zero with any coverage is a
/// single point of failure.
pub fn analyze_n1(
    index: &RunIndex<'_>,
    manager: &ConstraintManager,
    budget: &RunBudget,
    clock: &dyn Clock,
) -> (Vec<PersonResilience>, bool) {
    let state = ScheduleState::new(index);
    let mut people: Vec<&Person> = index.people().iter().collect();
    people.sort_by_key(|p| p.id().to_owned());

    let mut results = Vec::with_capacity(people.len());
    let mut truncated = false;

    for person in people {
        if budget.check(clock).is_some() {
            truncated = true;
            break;
        }
        let covered = covered_assignments(index, person);
        let mut uncoverable = Vec::new();
        for assignment in &covered {
            if !backfillable(index, &state, manager, assignment, &[person.id()]) {
                uncoverable.push(assignment.block_id().to_owned());
            }
        }
        let covered_count = covered.len() as u32;
        let score = if covered_count == 0 {
            1.0
        } else {
            (1.0 - uncoverable.len() as f64 / f64::from(covered_count)).max(0.0)
        };
        results.push(PersonResilience {
            person_id: person.id().to_owned(),
            covered_blocks: covered_count,
            uncoverable_blocks: uncoverable,
            score,
        });
    }
    (results, truncated)
}

/// N-2: joint removal over unordered pairs of the most critical people.
///
/// Pairs are drawn from the N-1 ranking (most critical first) and
/// evaluation stops after `pair_cap` pairs to contain the quadratic
/// blowup.
pub fn analyze_n2(
    index: &RunIndex<'_>,
    manager: &ConstraintManager,
    n1: &[PersonResilience],
    pair_cap: usize,
    budget: &RunBudget,
    clock: &dyn Clock,
) -> (Vec<PairResilience>, bool) {
    let state = ScheduleState::new(index);

    let mut ranked: Vec<&PersonResilience> = n1.iter().filter(|r| r.covered_blocks > 0).collect();
    ranked.sort_by(|a, b| {
        a.score
            .total_cmp(&b.score)
            .then_with(|| a.person_id.cmp(&b.person_id))
    });

    let mut results = Vec::new();
    let mut truncated = false;

    'pairs: for i in 0..ranked.len() {
        for j in (i + 1)..ranked.len() {
            if results.len() >= pair_cap {
                break 'pairs;
            }
            if budget.check(clock).is_some() {
                truncated = true;
                break 'pairs;
            }
            let (first, second) = (&ranked[i].person_id, &ranked[j].person_id);
            let removed: [&str; 2] = [first.as_str(), second.as_str()];

            let mut covered: Vec<&Assignment> = Vec::new();
            for id in [first, second] {
                if let Some(person) = index.person(id) {
                    covered.extend(covered_assignments(index, person));
                }
            }
            let mut uncoverable: Vec<Id> = Vec::new();
            for assignment in &covered {
                if !backfillable(index, &state, manager, assignment, &removed) {
                    uncoverable.push(assignment.block_id().to_owned());
                }
            }
            let covered_count = covered.len() as u32;
            let score = if covered_count == 0 {
                1.0
            } else {
                (1.0 - uncoverable.len() as f64 / f64::from(covered_count)).max(0.0)
            };
            results.push(PairResilience {
                first_id: first.clone(),
                second_id: second.clone(),
                covered_blocks: covered_count,
                uncoverable_blocks: uncoverable,
                score,
            });
        }
    }
    (results, truncated)
}
