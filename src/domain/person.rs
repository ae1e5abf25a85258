//! People: residents and faculty.

use std::collections::BTreeSet;

use crate::Id;

/// Whether a person is a trainee or supervising staff.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonKind {
    Resident,
    Faculty,
}

/// Postgraduate training year of a resident.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PgyLevel {
    Pgy1,
    Pgy2,
    Pgy3,
}

/// A schedulable person.
///
/// Kind and PGY are set at construction and immutable for the lifetime of
/// a scheduling run; [`Person::resident`] and [`Person::faculty`] make an
/// inconsistent combination unrepresentable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: Id,
    name: String,
    kind: PersonKind,
    pgy: Option<PgyLevel>,
    credentials: BTreeSet<String>,
    specialties: Vec<String>,
    performs_procedures: bool,
    supervises: bool,
}

impl Person {
    /// Creates a resident at the given training year.
    pub fn resident(id: impl Into<Id>, name: impl Into<String>, pgy: PgyLevel) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: PersonKind::Resident,
            pgy: Some(pgy),
            credentials: BTreeSet::new(),
            specialties: Vec::new(),
            performs_procedures: false,
            supervises: false,
        }
    }

    /// Creates a faculty member. Faculty carry no PGY level.
    pub fn faculty(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: PersonKind::Faculty,
            pgy: None,
            credentials: BTreeSet::new(),
            specialties: Vec::new(),
            performs_procedures: false,
            supervises: true,
        }
    }

    /// Adds a credential tag (e.g. a procedure certification).
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credentials.insert(credential.into());
        self
    }

    /// Adds a specialty tag.
    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialties.push(specialty.into());
        self
    }

    /// Marks whether this person performs procedures.
    pub fn performing_procedures(mut self, flag: bool) -> Self {
        self.performs_procedures = flag;
        self
    }

    /// Marks whether this faculty member is eligible to supervise.
    pub fn supervising(mut self, flag: bool) -> Self {
        self.supervises = flag;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PersonKind {
        self.kind
    }

    pub fn is_resident(&self) -> bool {
        self.kind == PersonKind::Resident
    }

    pub fn is_faculty(&self) -> bool {
        self.kind == PersonKind::Faculty
    }

    /// Training year; `None` for faculty.
    pub fn pgy(&self) -> Option<PgyLevel> {
        self.pgy
    }

    pub fn credentials(&self) -> &BTreeSet<String> {
        &self.credentials
    }

    pub fn has_credential(&self, credential: &str) -> bool {
        self.credentials.contains(credential)
    }

    pub fn specialties(&self) -> &[String] {
        &self.specialties
    }

    pub fn performs_procedures(&self) -> bool {
        self.performs_procedures
    }

    pub fn supervises(&self) -> bool {
        self.supervises
    }
}
