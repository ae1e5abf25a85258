//! Scheduling run input.

use super::config::SolveConfig;
use crate::domain::{
    Absence, Assignment, Block, DateWindow, DomainError, Person, RotationTemplate, RunIndex,
};

/// Everything one solve needs: entity snapshots, the preserved
/// assignment universe, and configuration.
///
/// The context owns its entities for the duration of the run; the
/// pipeline borrows them through [`SchedulingContext::index`].
#[derive(Debug, Clone)]
pub struct SchedulingContext {
    pub window: DateWindow,
    pub people: Vec<Person>,
    pub blocks: Vec<Block>,
    pub templates: Vec<RotationTemplate>,
    /// Pre-existing assignments. All of them are occupancy the solver
    /// must respect; non-solver-managed ones must additionally survive
    /// the run untouched.
    pub preserved: Vec<Assignment>,
    pub absences: Vec<Absence>,
    pub config: SolveConfig,
}

impl SchedulingContext {
    pub fn new(window: DateWindow, config: SolveConfig) -> Self {
        Self {
            window,
            people: Vec::new(),
            blocks: Vec::new(),
            templates: Vec::new(),
            preserved: Vec::new(),
            absences: Vec::new(),
            config,
        }
    }

    /// Builds the run index, validating input invariants.
    pub fn index(&self) -> Result<RunIndex<'_>, DomainError> {
        RunIndex::build(
            &self.people,
            &self.blocks,
            &self.templates,
            &self.preserved,
            &self.absences,
        )
    }
}
