//! Pipeline orchestration: stages four through eight.

use std::collections::HashMap;
use std::sync::Arc;

use super::candidates::{expand_candidates, generate_slots};
use super::config::Algorithm;
use super::context::SchedulingContext;
use super::cpsat::{CpModelSolver, CpSatBackend};
use super::greedy::GreedyBackend;
use super::min_conflicts::MinConflictsBackend;
use super::result::{SchedulingResult, SolveStatus, SolverStats};
use super::supervision::assign_supervision;
use super::{BackendOutcome, SolverBackend};
use crate::constraints::{
    CandidateSlot, ConstraintManager, DroppedCandidate, ScheduleState,
};
use crate::domain::{Assignment, DomainError, Role, RunIndex};
use crate::sink::{BudgetStop, CancelToken, Clock, LogLevel, LogSink, MetricsSink, RunBudget};

/// Orchestrates one scheduling run.
///
/// Owns nothing beyond sink references; every cache is rebuilt per run
/// and discarded with it. The pipeline returns errors only for input
/// invariant violations — backend trouble degrades to the greedy
/// fallback and lands in diagnostics instead.
#[derive(Debug)]
pub struct Pipeline<'s> {
    log: &'s dyn LogSink,
    metrics: &'s dyn MetricsSink,
    clock: &'s dyn Clock,
    cp_solver: Option<Arc<dyn CpModelSolver>>,
}

impl<'s> Pipeline<'s> {
    pub fn new(log: &'s dyn LogSink, metrics: &'s dyn MetricsSink, clock: &'s dyn Clock) -> Self {
        Self {
            log,
            metrics,
            clock,
            cp_solver: None,
        }
    }

    /// Wires in an external CP solver for the CP-SAT backend.
    pub fn with_cp_solver(mut self, solver: Arc<dyn CpModelSolver>) -> Self {
        self.cp_solver = Some(solver);
        self
    }

    /// Runs the full pipeline for one context.
    pub fn run(
        &self,
        ctx: &SchedulingContext,
        token: CancelToken,
    ) -> Result<SchedulingResult, DomainError> {
        let index = ctx.index()?;
        let budget = RunBudget::from_timeout(token, self.clock, ctx.config.timeout);
        let manager = if ctx.config.resilience_aware {
            ConstraintManager::resilience_aware(&ctx.config.rules)
        } else {
            ConstraintManager::default_set(&ctx.config.rules)
        };

        let mut stats = SolverStats {
            backend_used: ctx.config.algorithm.as_str().to_owned(),
            ..SolverStats::default()
        };

        // Preserved inputs that already break a hard rule poison the
        // whole run; report which rule and touch nothing.
        if let Some((constraint, reason)) = preserved_violation(&index) {
            self.log.event(
                LogLevel::Warn,
                &format!("preserved assignments violate {constraint}: {reason}"),
            );
            stats.infeasible_constraint = Some(constraint);
            return Ok(SchedulingResult::empty(SolveStatus::Infeasible, stats));
        }

        // Stages 1–3: slots, then candidates filtered through the
        // preserved map the index already holds.
        let slots = generate_slots(&index);
        let candidates = expand_candidates(&index, &slots);
        stats.candidates_generated = candidates.len();
        self.metrics
            .record("candidates_generated", candidates.len() as f64);

        if candidates.is_empty() {
            return Ok(SchedulingResult::empty(SolveStatus::Success, stats));
        }

        // Stage 4: hard propagation over the empty overlay.
        let state = ScheduleState::new(&index);
        let (kept, mut dropped) = manager.filter(candidates, &state);
        stats.candidates_dropped = dropped.len();

        // Stage 5: backend invocation with greedy fallback.
        let (outcome, state) = match self.dispatch(ctx, &kept, state, &manager, &budget) {
            Ok(pair) => pair,
            Err((reason, failed_state)) => {
                self.log.event(
                    LogLevel::Warn,
                    &format!(
                        "{} backend failed ({reason}); falling back to greedy",
                        ctx.config.algorithm.as_str()
                    ),
                );
                stats.backend_used = "greedy".to_owned();
                stats.backend_failure_reason = Some(reason);
                // The failed backend may have half-mutated the overlay;
                // rebuild it before the fallback sweep.
                drop(failed_state);
                let mut fresh = ScheduleState::new(&index);
                let outcome = GreedyBackend
                    .solve(&kept, &mut fresh, &manager, &budget, self.clock)
                    .unwrap_or_else(|_| BackendOutcome::empty());
                (outcome, fresh)
            }
        };
        let mut state = state;

        stats.iterations = outcome.iterations;
        if outcome.proven_infeasible {
            stats.infeasible_constraint = Some("proven by backend".to_owned());
            return Ok(SchedulingResult::empty(SolveStatus::Infeasible, stats));
        }

        // Stage 6: defense-in-depth re-check against preserved slots.
        let mut selected = Vec::with_capacity(outcome.selected.len());
        for slot in outcome.selected {
            if index.is_occupied(&slot.person_id, &slot.block_id) {
                self.log.event(
                    LogLevel::Warn,
                    &format!(
                        "backend emitted ({}, {}) over a preserved assignment; dropping",
                        slot.person_id, slot.block_id
                    ),
                );
                state.unplace(&slot);
                dropped.push(DroppedCandidate {
                    slot,
                    constraint: "unique_assignment_per_block".to_owned(),
                    reason: "collides with a preserved assignment".to_owned(),
                });
                continue;
            }
            selected.push(slot);
        }

        // Stage 7: greedy supervision for everything just placed.
        let supervision = assign_supervision(&mut state, &manager);
        stats.supervision_added = supervision.placed.len();

        // Stage 8: coverage accounting and status.
        stats.uncovered_slots = slots
            .iter()
            .filter(|(block, template)| {
                state.resident_count_on(block.id(), template.id()) < template.min_residents()
            })
            .count();
        stats.selected = selected.len();
        stats.cost = outcome.cost;
        self.metrics.record("assignments_selected", selected.len() as f64);
        self.metrics.record("solve_cost", outcome.cost);

        let status = match outcome.stop {
            Some(BudgetStop::Cancelled) => SolveStatus::Cancelled,
            Some(BudgetStop::DeadlineExceeded) => SolveStatus::Timeout,
            None if stats.uncovered_slots > 0 || supervision.shortfall > 0 => SolveStatus::Partial,
            None => SolveStatus::Success,
        };

        let assignments = materialize(&index, &selected, &supervision.placed, &stats.backend_used);
        self.log.event(
            LogLevel::Info,
            &format!(
                "solve finished: {} ({} assignments, {} supervising, {} uncovered)",
                status.as_str(),
                selected.len(),
                supervision.placed.len(),
                stats.uncovered_slots
            ),
        );

        Ok(SchedulingResult {
            status,
            assignments,
            dropped,
            stats,
        })
    }

    /// Runs the configured backend. On failure hands back the reason
    /// and the possibly-dirty state for the caller to discard.
    #[allow(clippy::type_complexity)]
    fn dispatch<'a>(
        &self,
        ctx: &SchedulingContext,
        kept: &[CandidateSlot],
        mut state: ScheduleState<'a>,
        manager: &ConstraintManager,
        budget: &RunBudget,
    ) -> Result<(BackendOutcome, ScheduleState<'a>), (String, ScheduleState<'a>)> {
        let result = match ctx.config.algorithm {
            Algorithm::Greedy => {
                GreedyBackend.solve(kept, &mut state, manager, budget, self.clock)
            }
            Algorithm::MinConflicts => {
                MinConflictsBackend::new(ctx.config.seed, ctx.config.min_conflicts_steps)
                    .solve(kept, &mut state, manager, budget, self.clock)
            }
            Algorithm::CpSat => {
                let backend = match &self.cp_solver {
                    Some(solver) => CpSatBackend::new(Arc::clone(solver)),
                    None => CpSatBackend::unavailable(),
                };
                backend.solve(kept, &mut state, manager, budget, self.clock)
            }
        };
        match result {
            Ok(outcome) => Ok((outcome, state)),
            Err(error) => Err((error.to_string(), state)),
        }
    }
}

/// Checks the preserved universe against the hard rules it can already
/// violate on its own: absences and supervision ratios.
fn preserved_violation(index: &RunIndex<'_>) -> Option<(String, String)> {
    for assignment in index.assignments() {
        let Some(block) = index.block(assignment.block_id()) else {
            continue;
        };
        if index.is_absent(assignment.person_id(), block.date()) {
            return Some((
                "absence_respect".to_owned(),
                format!(
                    "preserved assignment {} falls inside an absence of {}",
                    assignment.id(),
                    assignment.person_id()
                ),
            ));
        }
    }

    // Supervision: residents vs supervising faculty per (block, template).
    let mut residents: HashMap<(&str, &str), u32> = HashMap::new();
    let mut faculty: HashMap<(&str, &str), u32> = HashMap::new();
    for assignment in index.assignments() {
        let Some(person) = index.person(assignment.person_id()) else {
            continue;
        };
        let key = (assignment.block_id(), assignment.template_id());
        if person.is_resident() {
            *residents.entry(key).or_default() += 1;
        } else {
            *faculty.entry(key).or_default() += 1;
        }
    }
    let mut keys: Vec<&(&str, &str)> = residents.keys().collect();
    keys.sort();
    for key in keys {
        let Some(template) = index.template(key.1) else {
            continue;
        };
        let Some(rule) = template.supervision() else {
            continue;
        };
        let ratio = rule.max_residents_per_faculty.max(1);
        let required = residents[key].div_ceil(ratio);
        let present = faculty.get(key).copied().unwrap_or(0);
        if present < required {
            return Some((
                "supervision_ratio".to_owned(),
                format!(
                    "block {} has {} residents on {} with {} supervising faculty ({} required)",
                    key.0, residents[key], key.1, present, required
                ),
            ));
        }
    }
    None
}

/// Turns accepted slots into assignments. Ids derive from the slot so
/// identical runs produce byte-identical results.
fn materialize(
    index: &RunIndex<'_>,
    primaries: &[CandidateSlot],
    supervising: &[CandidateSlot],
    backend: &str,
) -> Vec<Assignment> {
    let mut ordered: Vec<&CandidateSlot> = primaries.iter().collect();
    ordered.sort_by_key(|s| {
        (
            index.block(&s.block_id).map(|b| b.key()),
            s.template_id.clone(),
            s.person_id.clone(),
        )
    });

    let mut assignments: Vec<Assignment> = ordered
        .into_iter()
        .map(|slot| {
            Assignment::new(
                format!("{}:{}", slot.person_id, slot.block_id),
                slot.person_id.clone(),
                slot.block_id.clone(),
                slot.template_id.clone(),
                Role::Primary,
            )
            .with_note(backend)
        })
        .collect();

    assignments.extend(supervising.iter().map(|slot| {
        Assignment::new(
            format!("{}:{}", slot.person_id, slot.block_id),
            slot.person_id.clone(),
            slot.block_id.clone(),
            slot.template_id.clone(),
            Role::Supervising,
        )
        .with_note("supervision")
    }));
    assignments
}
