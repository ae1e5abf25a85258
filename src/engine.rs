//! Public facade over the scheduling core.
//!
//! One [`ScheduleEngine`] owns the injected sinks and exposes the five
//! contract operations: schedule generation, context loading through a
//! repository, compliance validation, resilience analysis, and the two
//! constraint manager factories. The engine holds no per-run state;
//! every operation builds and discards its own caches.

use std::sync::Arc;

use thiserror::Error;

use crate::constraints::{ConstraintManager, RuleConfig};
use crate::domain::{
    Absence, Assignment, Block, DateWindow, DomainError, Person, RotationTemplate, RunIndex,
};
use crate::repository::{PersonFilter, RepositoryError, ScheduleRepository, TemplateFilter};
use crate::resilience::{AnalysisDepth, BurnoutReport, ResilienceAnalyzer, ResilienceReport};
use crate::sink::{
    CancelToken, Clock, LogSink, MetricsSink, NoopLog, NoopMetrics, RunBudget, SystemClock,
};
use crate::solver::{
    CpModelSolver, Pipeline, SchedulingContext, SchedulingResult, SolveConfig,
};
use crate::validate::{ComplianceValidator, ValidationReport, ValidatorConfig};

/// Fatal facade errors. Operational outcomes (infeasible, timeout,
/// partial, fallback) are [`SchedulingResult`] statuses instead.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Inputs break a data-model invariant; nothing was modified.
    #[error(transparent)]
    Invariant(#[from] DomainError),

    /// The repository collaborator failed; propagated unchanged.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The default constraint profile: hard rules plus PGY fairness.
pub fn constraint_manager_default(config: &RuleConfig) -> ConstraintManager {
    ConstraintManager::default_set(config)
}

/// The opt-in profile with the five resilience rules enabled.
pub fn constraint_manager_resilience_aware(config: &RuleConfig) -> ConstraintManager {
    ConstraintManager::resilience_aware(config)
}

/// Facade over pipeline, validator, and analyzer.
pub struct ScheduleEngine {
    log: Box<dyn LogSink>,
    metrics: Box<dyn MetricsSink>,
    clock: Box<dyn Clock>,
    cp_solver: Option<Arc<dyn CpModelSolver>>,
}

impl std::fmt::Debug for ScheduleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleEngine")
            .field("cp_solver", &self.cp_solver.is_some())
            .finish()
    }
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self {
            log: Box::new(NoopLog),
            metrics: Box::new(NoopMetrics),
            clock: Box::new(SystemClock),
            cp_solver: None,
        }
    }
}

impl ScheduleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, log: Box<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn with_metrics(mut self, metrics: Box<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Wires in an external CP solver for the CP-SAT backend. Without
    /// one, CP-SAT runs degrade to the greedy fallback.
    pub fn with_cp_solver(mut self, solver: Arc<dyn CpModelSolver>) -> Self {
        self.cp_solver = Some(solver);
        self
    }

    /// Runs the solver pipeline for one context.
    pub fn generate_schedule(
        &self,
        ctx: &SchedulingContext,
        token: CancelToken,
    ) -> Result<SchedulingResult, EngineError> {
        let mut pipeline = Pipeline::new(&*self.log, &*self.metrics, &*self.clock);
        if let Some(solver) = &self.cp_solver {
            pipeline = pipeline.with_cp_solver(Arc::clone(solver));
        }
        pipeline.run(ctx, token).map_err(EngineError::from)
    }

    /// Builds a context by reading entity snapshots from the
    /// repository. The only I/O on the core's critical path.
    pub fn load_context(
        &self,
        repository: &dyn ScheduleRepository,
        window: DateWindow,
        config: SolveConfig,
    ) -> Result<SchedulingContext, EngineError> {
        let mut ctx = SchedulingContext::new(window, config);
        ctx.people = repository.list_people(&PersonFilter::default())?;
        ctx.blocks = repository.list_blocks(&window)?;
        ctx.templates = repository.list_templates(&TemplateFilter::default())?;
        ctx.preserved = repository.list_assignments(&window)?;
        ctx.absences = repository.list_absences(&window)?;
        Ok(ctx)
    }

    /// Validates an assignment universe against the ACGME rules with
    /// default thresholds.
    #[allow(clippy::too_many_arguments)]
    pub fn validate_schedule(
        &self,
        people: &[Person],
        blocks: &[Block],
        templates: &[RotationTemplate],
        assignments: &[Assignment],
        window: DateWindow,
        token: CancelToken,
    ) -> ValidationReport {
        self.validate_schedule_with(
            ValidatorConfig::default(),
            people,
            blocks,
            templates,
            assignments,
            window,
            token,
        )
    }

    /// Validation with caller-tuned thresholds.
    #[allow(clippy::too_many_arguments)]
    pub fn validate_schedule_with(
        &self,
        config: ValidatorConfig,
        people: &[Person],
        blocks: &[Block],
        templates: &[RotationTemplate],
        assignments: &[Assignment],
        window: DateWindow,
        token: CancelToken,
    ) -> ValidationReport {
        let budget = RunBudget::new(token, None);
        ComplianceValidator::new(config).validate(
            people,
            blocks,
            templates,
            assignments,
            window,
            &budget,
            &*self.clock,
        )
    }

    /// Resilience analysis at the requested depth.
    #[allow(clippy::too_many_arguments)]
    pub fn analyze_resilience(
        &self,
        people: &[Person],
        blocks: &[Block],
        templates: &[RotationTemplate],
        assignments: &[Assignment],
        absences: &[Absence],
        depth: AnalysisDepth,
        token: CancelToken,
    ) -> Result<ResilienceReport, EngineError> {
        let index = RunIndex::build(people, blocks, templates, assignments, absences)?;
        let manager = ConstraintManager::default_set(&RuleConfig::default());
        let budget = RunBudget::new(token, None);
        Ok(ResilienceAnalyzer.analyze(&index, &manager, depth, &budget, &*self.clock))
    }

    /// SIR-style burnout cascade estimate over the same universe.
    pub fn burnout_cascade(
        &self,
        people: &[Person],
        blocks: &[Block],
        templates: &[RotationTemplate],
        assignments: &[Assignment],
    ) -> Result<BurnoutReport, EngineError> {
        let index = RunIndex::build(people, blocks, templates, assignments, &[])?;
        Ok(ResilienceAnalyzer.burnout_cascade(&index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ScheduleState;
    use crate::domain::{ActivityType, HalfDay, PgyLevel, Role};
    use crate::solver::candidates::{expand_candidates, generate_slots};
    use crate::solver::{Algorithm, SolveStatus};
    use crate::test_utils::{
        clinic_template, faculty, fmit_template, half_day_blocks, resident, template, window,
    };
    use crate::validate::ViolationKind;
    use chrono::{NaiveDate, Weekday};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    const WEEKDAYS: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    /// Block-10 fixture: 25 residents, 10 faculty, a 28-day window, a
    /// weekday clinic needing two residents and one supervisor per
    /// half-day, and 17 preserved inpatient assignments.
    fn block10_context() -> SchedulingContext {
        let start = date(6, 2); // Monday
        let end = date(6, 29); // Sunday, 28 days
        let mut ctx = SchedulingContext::new(window(start, end), SolveConfig::default());

        for i in 1..=25u32 {
            let pgy = match i % 3 {
                0 => PgyLevel::Pgy3,
                1 => PgyLevel::Pgy1,
                _ => PgyLevel::Pgy2,
            };
            ctx.people.push(resident(&format!("r{i:02}"), pgy));
        }
        for i in 1..=10u32 {
            ctx.people.push(faculty(&format!("f{i:02}")));
        }

        ctx.blocks = half_day_blocks(start, end);
        ctx.templates = vec![
            clinic_template("clinic")
                .with_min_residents(2)
                .supervised(4)
                .with_priority(10)
                .on_weekdays(WEEKDAYS),
            fmit_template("fmit"),
        ];

        // 17 preserved inpatient half-days: r01 on FMIT all of week
        // one, r02 for three days of week two, r03 one morning.
        let mut preserved = Vec::new();
        let mut n = 0;
        let mut push = |preserved: &mut Vec<Assignment>, person: &str, day: NaiveDate, half: HalfDay| {
            let block_id = match half {
                HalfDay::Am => format!("{day}-am"),
                HalfDay::Pm => format!("{day}-pm"),
            };
            preserved.push(
                Assignment::new(format!("prev-{n}"), person, block_id, "fmit", Role::Primary)
                    .preserved(),
            );
            n += 1;
        };
        for offset in 0..5u64 {
            let day = start + chrono::Days::new(offset);
            push(&mut preserved, "r01", day, HalfDay::Am);
            push(&mut preserved, "r01", day, HalfDay::Pm);
        }
        for offset in 7..10u64 {
            let day = start + chrono::Days::new(offset);
            push(&mut preserved, "r02", day, HalfDay::Am);
            push(&mut preserved, "r02", day, HalfDay::Pm);
        }
        push(&mut preserved, "r03", start + chrono::Days::new(14), HalfDay::Am);
        assert_eq!(preserved.len(), 17);
        ctx.preserved = preserved;
        ctx
    }

    // ── S1: block 10 happy path ───────────────────────────────────────

    #[test]
    fn s1_happy_path_covers_everything() {
        let ctx = block10_context();
        let engine = ScheduleEngine::new();
        let result = engine.generate_schedule(&ctx, CancelToken::new()).unwrap();

        assert_eq!(result.status, SolveStatus::Success);
        assert_eq!(result.stats.backend_used, "greedy");
        assert_eq!(result.stats.uncovered_slots, 0);

        // 20 weekdays × 2 halves × 2 residents primary, plus one
        // supervisor per clinic half-day.
        let primaries = result
            .assignments
            .iter()
            .filter(|a| a.role() == Role::Primary)
            .count();
        let supervising = result
            .assignments
            .iter()
            .filter(|a| a.role() == Role::Supervising)
            .count();
        assert_eq!(primaries, 80);
        assert_eq!(supervising, 40);

        // The union passes validation cleanly with full coverage.
        let union: Vec<Assignment> = ctx
            .preserved
            .iter()
            .cloned()
            .chain(result.assignments.iter().cloned())
            .collect();
        let report = engine.validate_schedule(
            &ctx.people,
            &ctx.blocks,
            &ctx.templates,
            &union,
            ctx.window,
            CancelToken::new(),
        );
        assert!(report.is_clean(), "unexpected: {:?}", report.violations);
        assert!((report.stats.coverage_rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn s1_preservation_and_uniqueness() {
        let ctx = block10_context();
        let engine = ScheduleEngine::new();
        let result = engine.generate_schedule(&ctx, CancelToken::new()).unwrap();

        // No produced assignment shares (person, block) with a
        // preserved one, and the union indexes cleanly.
        for produced in &result.assignments {
            assert!(!ctx
                .preserved
                .iter()
                .any(|p| p.slot_key() == produced.slot_key()));
        }
        let union: Vec<Assignment> = ctx
            .preserved
            .iter()
            .cloned()
            .chain(result.assignments.iter().cloned())
            .collect();
        assert!(RunIndex::build(&ctx.people, &ctx.blocks, &ctx.templates, &union, &[]).is_ok());
    }

    #[test]
    fn s1_solver_scope_purity() {
        let ctx = block10_context();
        let result = ScheduleEngine::new()
            .generate_schedule(&ctx, CancelToken::new())
            .unwrap();
        for assignment in &result.assignments {
            let template = ctx
                .templates
                .iter()
                .find(|t| t.id() == assignment.template_id())
                .unwrap();
            assert!(template.is_solver_managed());
        }
    }

    #[test]
    fn s1_determinism_byte_identical() {
        let ctx = block10_context();
        let engine = ScheduleEngine::new();
        let first = engine.generate_schedule(&ctx, CancelToken::new()).unwrap();
        let second = engine.generate_schedule(&ctx, CancelToken::new()).unwrap();
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    // ── S2: rotation map ordering ─────────────────────────────────────

    #[test]
    fn s2_preserved_inpatient_blocks_candidate() {
        let ctx = block10_context();
        let result = ScheduleEngine::new()
            .generate_schedule(&ctx, CancelToken::new())
            .unwrap();

        // r01 holds a preserved FMIT slot on every week-one block; no
        // clinic assignment may appear there.
        for assignment in &result.assignments {
            if assignment.person_id() == "r01" {
                let block = ctx
                    .blocks
                    .iter()
                    .find(|b| b.id() == assignment.block_id())
                    .unwrap();
                assert!(block.date() > date(6, 6), "r01 assigned during FMIT week");
            }
        }
        // And no candidate was ever emitted for those slots either.
        let index = ctx.index().unwrap();
        let candidates = expand_candidates(&index, &generate_slots(&index));
        assert!(!candidates
            .iter()
            .any(|c| c.person_id == "r01" && c.block_id.ends_with("-am") && c.block_id.starts_with("2025-06-02")));
    }

    // ── S3: FMIT faculty lockout ──────────────────────────────────────

    fn fmit_lockout_context() -> SchedulingContext {
        let start = date(6, 2);
        let end = date(6, 15);
        let mut ctx = SchedulingContext::new(window(start, end), SolveConfig::default());
        ctx.people = vec![
            resident("r1", PgyLevel::Pgy1),
            resident("r2", PgyLevel::Pgy2),
            resident("r3", PgyLevel::Pgy3),
            faculty("f1"),
            faculty("f2"),
        ];
        ctx.blocks = half_day_blocks(start, end);
        ctx.templates = vec![
            clinic_template("clinic").with_min_residents(1).supervised(4),
            fmit_template("fmit"),
        ];
        // f1 serves FMIT Mon 06-02 .. Fri 06-06, both halves.
        ctx.preserved = (0..5u64)
            .flat_map(|offset| {
                let day = start + chrono::Days::new(offset);
                [
                    Assignment::new(
                        format!("fmit-{offset}-am"),
                        "f1",
                        format!("{day}-am"),
                        "fmit",
                        Role::Primary,
                    )
                    .preserved(),
                    Assignment::new(
                        format!("fmit-{offset}-pm"),
                        "f1",
                        format!("{day}-pm"),
                        "fmit",
                        Role::Primary,
                    )
                    .preserved(),
                ]
            })
            .collect();
        ctx
    }

    #[test]
    fn s3_fmit_faculty_locked_out() {
        let ctx = fmit_lockout_context();
        let result = ScheduleEngine::new()
            .generate_schedule(&ctx, CancelToken::new())
            .unwrap();

        let f1_dates: Vec<NaiveDate> = result
            .assignments
            .iter()
            .filter(|a| a.person_id() == "f1")
            .map(|a| {
                ctx.blocks
                    .iter()
                    .find(|b| b.id() == a.block_id())
                    .unwrap()
                    .date()
            })
            .collect();

        // Nothing during the FMIT week (occupied), nothing on the
        // recovery Friday, nothing on the post-FMIT Sunday.
        assert!(f1_dates.iter().all(|&d| d > date(6, 6)));
        assert!(!f1_dates.contains(&date(6, 13)), "recovery Friday violated");
        assert!(!f1_dates.contains(&date(6, 8)), "post-FMIT Sunday violated");

        // Supervision on those days fell to f2.
        let f2_dates: Vec<NaiveDate> = result
            .assignments
            .iter()
            .filter(|a| a.person_id() == "f2" && a.role() == Role::Supervising)
            .map(|a| {
                ctx.blocks
                    .iter()
                    .find(|b| b.id() == a.block_id())
                    .unwrap()
                    .date()
            })
            .collect();
        assert!(f2_dates.contains(&date(6, 8)));
        assert!(f2_dates.contains(&date(6, 13)));
    }

    // ── S4: 80-hour multiple violations ───────────────────────────────

    #[test]
    fn s4_every_window_reported_in_order() {
        // Seven straight weeks of double clinic: 56 h/week against a
        // 40 h limit. Four 4-week windows fit, and all four must show.
        let start = date(6, 2);
        let end = date(7, 20); // 49 days
        let people = vec![resident("r1", PgyLevel::Pgy1)];
        let blocks = half_day_blocks(start, end);
        let templates = vec![clinic_template("clinic")];
        let assignments: Vec<Assignment> = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| Assignment::new(format!("a{i}"), "r1", b.id(), "clinic", Role::Primary))
            .collect();

        let report = ScheduleEngine::new().validate_schedule_with(
            ValidatorConfig {
                weekly_hour_limit: 40.0,
                ..ValidatorConfig::default()
            },
            &people,
            &blocks,
            &templates,
            &assignments,
            window(start, end),
            CancelToken::new(),
        );

        let eighty: Vec<_> = report
            .violations
            .iter()
            .filter(|v| v.kind == ViolationKind::EightyHour)
            .collect();
        assert_eq!(eighty.len(), 4);
        let starts: Vec<_> = eighty.iter().map(|v| v.window_start.unwrap()).collect();
        assert_eq!(starts, vec![date(6, 2), date(6, 9), date(6, 16), date(6, 23)]);
        for violation in &eighty {
            assert_eq!(violation.severity, crate::validate::Severity::Critical);
            assert!((violation.observed - 56.0).abs() < 1e-9);
        }
        // Criticals sort ahead of everything else.
        assert_eq!(report.violations[0].kind, ViolationKind::EightyHour);
        assert_eq!(report.count_of(ViolationKind::EightyHour), 4);
    }

    #[test]
    fn s4_validator_purity() {
        let start = date(6, 2);
        let end = date(6, 29);
        let people = vec![resident("r1", PgyLevel::Pgy1)];
        let blocks = half_day_blocks(start, end);
        let templates = vec![clinic_template("clinic")];
        let assignments: Vec<Assignment> = blocks
            .iter()
            .enumerate()
            .map(|(i, b)| Assignment::new(format!("a{i}"), "r1", b.id(), "clinic", Role::Primary))
            .collect();

        let engine = ScheduleEngine::new();
        let run = || {
            engine.validate_schedule(
                &people,
                &blocks,
                &templates,
                &assignments,
                window(start, end),
                CancelToken::new(),
            )
        };
        assert_eq!(run(), run());
    }

    // ── S5: SPOF detection ────────────────────────────────────────────

    #[test]
    fn s5_sole_credential_holder_is_spof() {
        let start = date(6, 2);
        let end = date(6, 8);
        let people = vec![
            Person::faculty("f1", "F1").with_credential("sports_medicine"),
            Person::faculty("f2", "F2"),
            resident("r1", PgyLevel::Pgy1),
        ];
        let blocks = half_day_blocks(start, end);
        let templates = vec![
            template("sports", ActivityType::Outpatient).requiring_credential("sports_medicine"),
        ];
        let assignments: Vec<Assignment> = blocks
            .iter()
            .filter(|b| b.half() == HalfDay::Am)
            .enumerate()
            .map(|(i, b)| {
                Assignment::new(format!("a{i}"), "f1", b.id(), "sports", Role::Primary).preserved()
            })
            .collect();
        assert_eq!(assignments.len(), 7);

        let report = ScheduleEngine::new()
            .analyze_resilience(
                &people,
                &blocks,
                &templates,
                &assignments,
                &[],
                AnalysisDepth::N1,
                CancelToken::new(),
            )
            .unwrap();

        assert_eq!(report.single_points_of_failure, vec!["f1".to_owned()]);
        let n1 = report.n1.unwrap();
        let f1 = n1.iter().find(|r| r.person_id == "f1").unwrap();
        assert_eq!(f1.score, 0.0);
        assert_eq!(f1.uncoverable_blocks.len(), 7);
    }

    // ── S6: backend fallback ──────────────────────────────────────────

    #[test]
    fn s6_cp_sat_unavailable_falls_back_to_greedy() {
        let mut ctx = block10_context();
        ctx.config.algorithm = Algorithm::CpSat;

        let result = ScheduleEngine::new()
            .generate_schedule(&ctx, CancelToken::new())
            .unwrap();

        assert_eq!(result.status, SolveStatus::Success);
        assert_eq!(result.stats.backend_used, "greedy");
        assert!(result.stats.backend_failure_reason.is_some());
        assert_eq!(
            result.assignments.len(),
            120,
            "fallback must still cover the window"
        );
    }

    // ── failure semantics ─────────────────────────────────────────────

    #[test]
    fn empty_context_is_success() {
        let ctx = SchedulingContext::new(window(date(6, 2), date(6, 8)), SolveConfig::default());
        let result = ScheduleEngine::new()
            .generate_schedule(&ctx, CancelToken::new())
            .unwrap();
        assert_eq!(result.status, SolveStatus::Success);
        assert!(result.assignments.is_empty());
    }

    #[test]
    fn inconsistent_preserved_is_infeasible() {
        let mut ctx = fmit_lockout_context();
        // f1 is marked absent during their own preserved FMIT week.
        ctx.absences.push(
            Absence::new("f1", date(6, 2), date(6, 6), crate::domain::AbsenceKind::Sick).unwrap(),
        );
        let result = ScheduleEngine::new()
            .generate_schedule(&ctx, CancelToken::new())
            .unwrap();
        assert_eq!(result.status, SolveStatus::Infeasible);
        assert_eq!(
            result.stats.infeasible_constraint.as_deref(),
            Some("absence_respect")
        );
        assert!(result.assignments.is_empty());
    }

    #[test]
    fn duplicate_occupancy_is_invariant_violation() {
        let mut ctx = fmit_lockout_context();
        let duplicate = ctx.preserved[0].clone();
        let clash = Assignment::new(
            "dup",
            duplicate.person_id(),
            duplicate.block_id(),
            "clinic",
            Role::Primary,
        );
        ctx.preserved.push(clash);
        let err = ScheduleEngine::new()
            .generate_schedule(&ctx, CancelToken::new())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Invariant(DomainError::DuplicateAssignment { .. })
        ));
    }

    #[test]
    fn pre_cancelled_token_reports_cancelled() {
        let ctx = block10_context();
        let token = CancelToken::new();
        token.cancel();
        let result = ScheduleEngine::new().generate_schedule(&ctx, token).unwrap();
        assert_eq!(result.status, SolveStatus::Cancelled);
    }

    #[test]
    fn zero_timeout_reports_timeout() {
        let mut ctx = block10_context();
        ctx.config.timeout = Some(std::time::Duration::ZERO);
        let result = ScheduleEngine::new()
            .generate_schedule(&ctx, CancelToken::new())
            .unwrap();
        assert_eq!(result.status, SolveStatus::Timeout);
    }

    // ── filter monotonicity ───────────────────────────────────────────

    #[test]
    fn disabling_a_rule_never_shrinks_the_candidate_set() {
        let ctx = block10_context();
        let index = ctx.index().unwrap();
        let state = ScheduleState::new(&index);
        let candidates = expand_candidates(&index, &generate_slots(&index));

        let full = ConstraintManager::default_set(&RuleConfig::default());
        let (kept_full, _) = full.filter(candidates.clone(), &state);

        let mut relaxed = ConstraintManager::default_set(&RuleConfig::default());
        relaxed.disable("resident_inpatient_headcount").unwrap();
        let (kept_relaxed, _) = relaxed.filter(candidates, &state);

        assert!(kept_relaxed.len() >= kept_full.len());
        // Everything the strict profile kept survives the relaxed one.
        for slot in &kept_full {
            assert!(kept_relaxed.contains(slot));
        }
    }

    // ── resilience-aware profile ──────────────────────────────────────

    #[test]
    fn factories_expose_the_documented_profiles() {
        let config = RuleConfig::default();
        let default = constraint_manager_default(&config);
        let aware = constraint_manager_resilience_aware(&config);
        assert!(!default.is_enabled("n1_vulnerability"));
        assert!(aware.is_enabled("n1_vulnerability"));
        assert!(default.is_enabled("fairness_by_pgy"));
        assert!(aware.is_enabled("fairness_by_pgy"));
    }

    #[test]
    fn resilience_aware_run_still_covers() {
        let mut ctx = block10_context();
        ctx.config.resilience_aware = true;
        let result = ScheduleEngine::new()
            .generate_schedule(&ctx, CancelToken::new())
            .unwrap();
        assert_eq!(result.status, SolveStatus::Success);
        assert_eq!(result.stats.uncovered_slots, 0);
    }

    // ── deeper analysis depths ────────────────────────────────────────

    #[test]
    fn n2_depth_reports_bounded_pairs() {
        let start = date(6, 2);
        let end = date(6, 4);
        let people = vec![
            resident("r1", PgyLevel::Pgy1),
            resident("r2", PgyLevel::Pgy1),
            resident("r3", PgyLevel::Pgy1),
        ];
        let blocks = half_day_blocks(start, end);
        let templates = vec![clinic_template("clinic")];
        let assignments = vec![
            Assignment::new("a1", "r1", "2025-06-02-am", "clinic", Role::Primary),
            Assignment::new("a2", "r2", "2025-06-03-am", "clinic", Role::Primary),
            Assignment::new("a3", "r3", "2025-06-04-am", "clinic", Role::Primary),
        ];

        let report = ScheduleEngine::new()
            .analyze_resilience(
                &people,
                &blocks,
                &templates,
                &assignments,
                &[],
                AnalysisDepth::N2 { pair_cap: 2 },
                CancelToken::new(),
            )
            .unwrap();

        assert!(report.n1.is_some());
        let pairs = report.n2.unwrap();
        assert_eq!(pairs.len(), 2);
        // Plenty of cover in this roster: no SPOFs, high pair scores.
        assert!(report.single_points_of_failure.is_empty());
        assert!(pairs.iter().all(|p| p.score > 0.0));
    }

    #[test]
    fn utilization_only_depth_skips_contingency() {
        let ctx = block10_context();
        let report = ScheduleEngine::new()
            .analyze_resilience(
                &ctx.people,
                &ctx.blocks,
                &ctx.templates,
                &ctx.preserved,
                &[],
                AnalysisDepth::UtilizationOnly,
                CancelToken::new(),
            )
            .unwrap();
        assert!(report.n1.is_none());
        assert!(report.n2.is_none());
        assert!(report.utilization.defense_level.is_some());
        assert_eq!(report.utilization.per_block.len(), 56);
    }

    #[test]
    fn burnout_estimate_is_pure() {
        let ctx = block10_context();
        let engine = ScheduleEngine::new();
        let first = engine
            .burnout_cascade(&ctx.people, &ctx.blocks, &ctx.templates, &ctx.preserved)
            .unwrap();
        let second = engine
            .burnout_cascade(&ctx.people, &ctx.blocks, &ctx.templates, &ctx.preserved)
            .unwrap();
        assert_eq!(first, second);
        // Nobody in the light preserved-only universe is overloaded.
        assert!(first.overloaded.is_empty());
    }

    #[test]
    fn cancelled_validation_is_truncated() {
        let ctx = block10_context();
        let token = CancelToken::new();
        token.cancel();
        let report = ScheduleEngine::new().validate_schedule(
            &ctx.people,
            &ctx.blocks,
            &ctx.templates,
            &ctx.preserved,
            ctx.window,
            token,
        );
        assert!(report.truncated);
        assert_eq!(report.stats.residents_checked, 0);
    }

    // ── repository loading ────────────────────────────────────────────

    #[test]
    fn load_context_pulls_window_snapshots() {
        let start = date(6, 2);
        let end = date(6, 8);
        let repo = crate::repository::InMemoryRepository {
            people: vec![resident("r1", PgyLevel::Pgy1), faculty("f1")],
            blocks: half_day_blocks(start, date(6, 30)),
            templates: vec![clinic_template("clinic")],
            assignments: vec![],
            absences: vec![],
        };
        let ctx = ScheduleEngine::new()
            .load_context(&repo, window(start, end), SolveConfig::default())
            .unwrap();
        assert_eq!(ctx.people.len(), 2);
        // Only blocks inside the window made it in.
        assert_eq!(ctx.blocks.len(), 14);
    }
}
