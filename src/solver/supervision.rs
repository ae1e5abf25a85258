//! Faculty supervision assignment: pipeline stage seven.

use crate::constraints::{CandidateSlot, ConstraintManager, ScheduleState};
use crate::domain::RotationTemplate;

/// Result of the supervision pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SupervisionOutcome {
    /// Supervising placements, committed into the state.
    pub placed: Vec<CandidateSlot>,
    /// (block, template) slots left under-supervised because no
    /// eligible faculty could be reached.
    pub shortfall: usize,
}

/// Greedy supervision pass.
///
/// Scans blocks in time order; for every understaffed
/// supervision-required template it picks the eligible faculty with the
/// lowest current load (person-id tie-break) until the ratio is met.
/// Eligibility goes through full hard propagation, so faculty on FMIT,
/// in recovery, absent, or already booked never get picked.
pub fn assign_supervision(
    state: &mut ScheduleState<'_>,
    manager: &ConstraintManager,
) -> SupervisionOutcome {
    let mut outcome = SupervisionOutcome::default();
    let index = state.index();

    let mut supervised: Vec<&RotationTemplate> = index
        .templates()
        .iter()
        .filter(|t| t.is_supervision_required())
        .collect();
    supervised.sort_by_key(|t| t.id().to_owned());

    let blocks: Vec<_> = index.blocks_in_order().collect();
    for block in blocks {
        for &template in &supervised {
            let Some(rule) = template.supervision() else {
                continue;
            };
            let residents = state.resident_count_on(block.id(), template.id());
            if residents == 0 {
                continue;
            }
            let ratio = rule.max_residents_per_faculty.max(1);
            let required = residents.div_ceil(ratio);

            while state.supervisor_count_on(block.id(), template.id()) < required {
                let mut available = state.available_supervisors(block, template);
                available.sort_by_key(|p| (state.load_of(p.id()), p.id().to_owned()));

                let pick = available.into_iter().find_map(|person| {
                    let slot = CandidateSlot::new(person.id(), block.id(), template.id());
                    manager.propagate(&slot, state).is_allowed().then_some(slot)
                });

                match pick {
                    Some(slot) => {
                        state.place(&slot);
                        outcome.placed.push(slot);
                    }
                    None => {
                        outcome.shortfall += 1;
                        break;
                    }
                }
            }
        }
    }
    outcome
}
