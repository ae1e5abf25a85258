//! ACGME compliance validator.
//!
//! Runs post-hoc over the union of preserved and produced assignments
//! and reports every rule breach it finds: the 80-hour rule over every
//! rolling 4-week window, one-day-off-in-seven over every rolling 7-day
//! window, supervision ratios per block, and consecutive-duty runs. The
//! validator never stops at the first violation per resident; every
//! failing window is its own finding.

pub mod consecutive;
pub mod duty_hours;
pub mod report;
pub mod supervision;

pub use report::{Severity, ValidationReport, ValidationStats, Violation, ViolationKind};

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{Assignment, Block, DateWindow, Person, RotationTemplate};
use crate::sink::{Clock, RunBudget};

/// Validator tuning.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Average weekly duty-hour ceiling over 4-week windows.
    pub weekly_hour_limit: f64,
    /// Longest permitted run of consecutive duty days.
    pub max_consecutive_duty_days: u32,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            weekly_hour_limit: 80.0,
            max_consecutive_duty_days: 6,
        }
    }
}

/// Read-only view the rule passes share.
///
/// Built tolerant of malformed input: unknown ids simply do not
/// resolve, duplicate (person, block) pairs all count. The validator
/// reports on what it is given rather than erroring.
#[derive(Debug)]
pub(crate) struct ValidationView<'a> {
    pub window: DateWindow,
    pub people: &'a [Person],
    person_by_id: HashMap<&'a str, &'a Person>,
    block_by_id: HashMap<&'a str, &'a Block>,
    template_by_id: HashMap<&'a str, &'a RotationTemplate>,
    by_person: HashMap<&'a str, Vec<&'a Assignment>>,
    by_block: HashMap<&'a str, Vec<&'a Assignment>>,
    blocks_in_order: Vec<&'a Block>,
}

impl<'a> ValidationView<'a> {
    pub fn new(
        people: &'a [Person],
        blocks: &'a [Block],
        templates: &'a [RotationTemplate],
        assignments: &'a [Assignment],
        window: DateWindow,
    ) -> Self {
        let person_by_id = people.iter().map(|p| (p.id(), p)).collect();
        let block_by_id: HashMap<&str, &Block> = blocks.iter().map(|b| (b.id(), b)).collect();
        let template_by_id = templates.iter().map(|t| (t.id(), t)).collect();

        let mut by_person: HashMap<&str, Vec<&Assignment>> = HashMap::new();
        let mut by_block: HashMap<&str, Vec<&Assignment>> = HashMap::new();
        for assignment in assignments {
            by_person
                .entry(assignment.person_id())
                .or_default()
                .push(assignment);
            by_block
                .entry(assignment.block_id())
                .or_default()
                .push(assignment);
        }

        let mut blocks_in_order: Vec<&Block> = blocks.iter().collect();
        blocks_in_order.sort_by_key(|b| b.key());

        Self {
            window,
            people,
            person_by_id,
            block_by_id,
            template_by_id,
            by_person,
            by_block,
            blocks_in_order,
        }
    }

    pub fn person(&self, id: &str) -> Option<&'a Person> {
        self.person_by_id.get(id).copied()
    }

    pub fn block(&self, id: &str) -> Option<&'a Block> {
        self.block_by_id.get(id).copied()
    }

    pub fn template(&self, id: &str) -> Option<&'a RotationTemplate> {
        self.template_by_id.get(id).copied()
    }

    pub fn assignments_of(&self, person_id: &str) -> &[&'a Assignment] {
        self.by_person
            .get(person_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn assignments_on(&self, block_id: &str) -> &[&'a Assignment] {
        self.by_block
            .get(block_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn blocks_in_order(&self) -> &[&'a Block] {
        &self.blocks_in_order
    }

    /// Template ids in sorted order.
    pub fn template_ids(&self) -> Vec<&'a str> {
        let mut ids: Vec<&str> = self.template_by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Residents in id order; the iteration order of every per-person
    /// rule pass.
    pub fn residents(&self) -> Vec<&'a Person> {
        let mut residents: Vec<&Person> =
            self.people.iter().filter(|p| p.is_resident()).collect();
        residents.sort_by_key(|p| p.id().to_owned());
        residents
    }

    /// Productive duty dates and hours for one person.
    pub fn duty_hours_by_date(&self, person_id: &str) -> HashMap<NaiveDate, f64> {
        duty_hours::hours_by_date(self, person_id)
    }
}

/// The compliance validator.
#[derive(Debug, Clone, Default)]
pub struct ComplianceValidator {
    config: ValidatorConfig,
}

impl ComplianceValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validates the assignment universe and returns the report.
    ///
    /// Honors cancellation at one-resident / one-block granularity; a
    /// stopped pass marks the report truncated rather than erroring.
    pub fn validate(
        &self,
        people: &[Person],
        blocks: &[Block],
        templates: &[RotationTemplate],
        assignments: &[Assignment],
        window: DateWindow,
        budget: &RunBudget,
        clock: &dyn Clock,
    ) -> ValidationReport {
        let view = ValidationView::new(people, blocks, templates, assignments, window);
        let mut report = ValidationReport::default();

        for resident in view.residents() {
            if budget.check(clock).is_some() {
                report.truncated = true;
                break;
            }
            report.stats.residents_checked += 1;
            duty_hours::check_eighty_hour(
                &view,
                resident,
                self.config.weekly_hour_limit,
                &mut report.violations,
            );
            duty_hours::check_one_in_seven(&view, resident, &mut report.violations);
            consecutive::check_consecutive_duty(
                &view,
                resident,
                self.config.max_consecutive_duty_days,
                &mut report.violations,
            );
        }

        if !report.truncated {
            for &block in view.blocks_in_order() {
                if budget.check(clock).is_some() {
                    report.truncated = true;
                    break;
                }
                report.stats.blocks_checked += 1;
                supervision::check_block_supervision(&view, block, &mut report.violations);
            }
        }

        report.stats.coverage_rate = coverage_rate(&view);
        for violation in &report.violations {
            *report
                .stats
                .counts
                .entry(violation.kind.as_str().to_owned())
                .or_default() += 1;
        }
        report
            .violations
            .sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        report
    }
}

/// Filled fraction of required (block, template) coverage.
fn coverage_rate(view: &ValidationView<'_>) -> f64 {
    let mut required_total: u64 = 0;
    let mut covered_total: u64 = 0;

    for &block in view.blocks_in_order() {
        let mut on_template: HashMap<&str, u32> = HashMap::new();
        for assignment in view.assignments_on(block.id()) {
            let is_resident = view
                .person(assignment.person_id())
                .is_some_and(Person::is_resident);
            if is_resident {
                *on_template.entry(assignment.template_id()).or_default() += 1;
            }
        }
        for template_id in view.template_ids() {
            let Some(template) = view.template(template_id) else {
                continue;
            };
            if !template.is_solver_managed()
                || !template.is_active_on(block.date())
                || template.min_residents() == 0
            {
                continue;
            }
            let assigned = on_template.get(template_id).copied().unwrap_or(0);
            required_total += u64::from(template.min_residents());
            covered_total += u64::from(assigned.min(template.min_residents()));
        }
    }

    if required_total == 0 {
        1.0
    } else {
        covered_total as f64 / required_total as f64
    }
}
