//! Repository boundary: the only I/O on the core's critical path.
//!
//! The caller implements [`ScheduleRepository`] over whatever store it
//! uses; the core reads entity snapshots through it at the start of a
//! run and never writes anything back. [`InMemoryRepository`] is the
//! reference implementation and test double.

use thiserror::Error;

use crate::domain::{Absence, Assignment, Block, DateWindow, Person, PersonKind, RotationTemplate};

/// Collaborator failure while loading entities. Propagated unchanged by
/// the facade; the core has mutated nothing when it surfaces.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),

    #[error("repository query failed: {0}")]
    Query(String),
}

/// Filter for [`ScheduleRepository::list_people`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    pub kind: Option<PersonKind>,
    /// Only people carrying this credential.
    pub credential: Option<String>,
}

impl PersonFilter {
    pub fn matches(&self, person: &Person) -> bool {
        if let Some(kind) = self.kind {
            if person.kind() != kind {
                return false;
            }
        }
        if let Some(credential) = &self.credential {
            if !person.has_credential(credential) {
                return false;
            }
        }
        true
    }
}

/// Filter for [`ScheduleRepository::list_templates`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    /// Only solver-managed templates (Outpatient, Procedures).
    pub solver_managed_only: bool,
}

impl TemplateFilter {
    pub fn matches(&self, template: &RotationTemplate) -> bool {
        !self.solver_managed_only || template.is_solver_managed()
    }
}

/// Read-only entity source for one scheduling run.
pub trait ScheduleRepository {
    fn list_people(&self, filter: &PersonFilter) -> Result<Vec<Person>, RepositoryError>;

    fn list_blocks(&self, window: &DateWindow) -> Result<Vec<Block>, RepositoryError>;

    fn list_templates(
        &self,
        filter: &TemplateFilter,
    ) -> Result<Vec<RotationTemplate>, RepositoryError>;

    /// All existing assignments intersecting the window. These are the
    /// preserved inputs of a run; deletion of superseded solver-managed
    /// rows is the caller's job, and only after a successful solve.
    fn list_assignments(&self, window: &DateWindow) -> Result<Vec<Assignment>, RepositoryError>;

    fn list_absences(&self, window: &DateWindow) -> Result<Vec<Absence>, RepositoryError>;
}

/// In-process repository over owned vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    pub people: Vec<Person>,
    pub blocks: Vec<Block>,
    pub templates: Vec<RotationTemplate>,
    pub assignments: Vec<Assignment>,
    pub absences: Vec<Absence>,
}

impl ScheduleRepository for InMemoryRepository {
    fn list_people(&self, filter: &PersonFilter) -> Result<Vec<Person>, RepositoryError> {
        Ok(self
            .people
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    fn list_blocks(&self, window: &DateWindow) -> Result<Vec<Block>, RepositoryError> {
        Ok(self
            .blocks
            .iter()
            .filter(|b| window.contains(b.date()))
            .cloned()
            .collect())
    }

    fn list_templates(
        &self,
        filter: &TemplateFilter,
    ) -> Result<Vec<RotationTemplate>, RepositoryError> {
        Ok(self
            .templates
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    fn list_assignments(&self, window: &DateWindow) -> Result<Vec<Assignment>, RepositoryError> {
        let in_window: Vec<Assignment> = self
            .assignments
            .iter()
            .filter(|a| {
                self.blocks
                    .iter()
                    .find(|b| b.id() == a.block_id())
                    .is_some_and(|b| window.contains(b.date()))
            })
            .cloned()
            .collect();
        Ok(in_window)
    }

    fn list_absences(&self, window: &DateWindow) -> Result<Vec<Absence>, RepositoryError> {
        Ok(self
            .absences
            .iter()
            .filter(|a| a.start() <= window.end() && a.end() >= window.start())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityType, HalfDay, PgyLevel};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn repo() -> InMemoryRepository {
        InMemoryRepository {
            people: vec![
                Person::resident("r1", "R1", PgyLevel::Pgy1),
                Person::faculty("f1", "F1").with_credential("sports_medicine"),
            ],
            blocks: vec![
                Block::new("b1", date(2), HalfDay::Am, 10),
                Block::new("b2", date(9), HalfDay::Am, 10),
            ],
            templates: vec![
                RotationTemplate::new("clinic", "Clinic", ActivityType::Outpatient),
                RotationTemplate::new("fmit", "FMIT", ActivityType::Inpatient),
            ],
            assignments: vec![],
            absences: vec![],
        }
    }

    #[test]
    fn person_filter_by_kind_and_credential() {
        let repo = repo();
        let faculty = repo
            .list_people(&PersonFilter {
                kind: Some(PersonKind::Faculty),
                credential: None,
            })
            .unwrap();
        assert_eq!(faculty.len(), 1);

        let credentialed = repo
            .list_people(&PersonFilter {
                kind: None,
                credential: Some("sports_medicine".into()),
            })
            .unwrap();
        assert_eq!(credentialed.len(), 1);
        assert_eq!(credentialed[0].id(), "f1");
    }

    #[test]
    fn blocks_filtered_by_window() {
        let repo = repo();
        let window = DateWindow::new(date(1), date(7)).unwrap();
        let blocks = repo.list_blocks(&window).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id(), "b1");
    }

    #[test]
    fn template_filter_solver_managed() {
        let repo = repo();
        let managed = repo
            .list_templates(&TemplateFilter {
                solver_managed_only: true,
            })
            .unwrap();
        assert_eq!(managed.len(), 1);
        assert_eq!(managed[0].id(), "clinic");
    }
}
