//! Assignments: one person on one block on one template.

use crate::Id;

/// Role a person plays within an assignment.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Primary,
    Supervising,
    Backup,
}

/// A (person, block, template) triple.
///
/// (person, block) is unique across the assignment universe of a run;
/// [`RunIndex`] construction rejects duplicates. Preserved assignments
/// must pass through a solve untouched.
///
/// [`RunIndex`]: super::indices::RunIndex
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    id: Id,
    person_id: Id,
    block_id: Id,
    template_id: Id,
    role: Role,
    preserved: bool,
    note: Option<String>,
}

impl Assignment {
    pub fn new(
        id: impl Into<Id>,
        person_id: impl Into<Id>,
        block_id: impl Into<Id>,
        template_id: impl Into<Id>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            person_id: person_id.into(),
            block_id: block_id.into(),
            template_id: template_id.into(),
            role,
            preserved: false,
            note: None,
        }
    }

    /// Marks the assignment immutable for the solver.
    pub fn preserved(mut self) -> Self {
        self.preserved = true;
        self
    }

    /// Attaches a provenance note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_preserved(&self) -> bool {
        self.preserved
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// The (person, block) occupancy key.
    pub fn slot_key(&self) -> (&str, &str) {
        (&self.person_id, &self.block_id)
    }
}
