//! Rotation templates: named activities a person can be assigned to.

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::Id;

/// Activity class of a rotation template.
///
/// The class alone determines whether the solver may touch assignments on
/// the template: only `Outpatient` and `Procedures` are solver-managed,
/// everything else is preserved verbatim through a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Outpatient,
    Procedures,
    Inpatient,
    Off,
    Education,
    Absence,
    Recovery,
}

impl ActivityType {
    /// True if the solver may create or delete assignments of this class.
    pub fn is_solver_managed(self) -> bool {
        matches!(self, Self::Outpatient | Self::Procedures)
    }

    /// True if a half-day of this class counts toward duty hours.
    pub fn is_productive(self) -> bool {
        matches!(self, Self::Outpatient | Self::Procedures | Self::Inpatient)
    }
}

/// Resident-to-faculty supervision requirement on a template.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisionRule {
    /// Ceiling on residents per supervising faculty member.
    pub max_residents_per_faculty: u32,
}

/// A named activity with coverage requirements and eligibility rules.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationTemplate {
    id: Id,
    name: String,
    activity: ActivityType,
    required_credential: Option<String>,
    supervision: Option<SupervisionRule>,
    min_residents: u32,
    max_headcount: u32,
    priority: i32,
    zone: Option<String>,
    tags: BTreeSet<String>,
    weekdays: Option<HashSet<Weekday>>,
}

impl RotationTemplate {
    pub fn new(id: impl Into<Id>, name: impl Into<String>, activity: ActivityType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            activity,
            required_credential: None,
            supervision: None,
            min_residents: 0,
            max_headcount: u32::MAX,
            priority: 0,
            zone: None,
            tags: BTreeSet::new(),
            weekdays: None,
        }
    }

    /// Requires a credential for any person assigned here.
    pub fn requiring_credential(mut self, credential: impl Into<String>) -> Self {
        self.required_credential = Some(credential.into());
        self
    }

    /// Requires faculty supervision at the given resident-per-faculty ratio.
    pub fn supervised(mut self, max_residents_per_faculty: u32) -> Self {
        self.supervision = Some(SupervisionRule {
            max_residents_per_faculty,
        });
        self
    }

    /// Required resident coverage per block.
    pub fn with_min_residents(mut self, min: u32) -> Self {
        self.min_residents = min;
        self
    }

    /// Ceiling on total people per block.
    pub fn with_max_headcount(mut self, max: u32) -> Self {
        self.max_headcount = max;
        self
    }

    /// Fill priority; higher templates are filled first.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Operational zone label (clinic wing, site).
    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Adds a free-form tag (e.g. `"fmit"`, `"call"`).
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Restricts the template to the given weekdays. Untouched templates
    /// are active every day.
    pub fn on_weekdays(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekdays = Some(days.into_iter().collect());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn activity(&self) -> ActivityType {
        self.activity
    }

    pub fn required_credential(&self) -> Option<&str> {
        self.required_credential.as_deref()
    }

    pub fn supervision(&self) -> Option<SupervisionRule> {
        self.supervision
    }

    pub fn is_supervision_required(&self) -> bool {
        self.supervision.is_some()
    }

    pub fn min_residents(&self) -> u32 {
        self.min_residents
    }

    pub fn max_headcount(&self) -> u32 {
        self.max_headcount
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_solver_managed(&self) -> bool {
        self.activity.is_solver_managed()
    }

    /// True if the person meets the template's eligibility rules
    /// (credential, procedures capability). Kind is the caller's concern.
    pub fn accepts(&self, person: &super::person::Person) -> bool {
        if let Some(credential) = &self.required_credential {
            if !person.has_credential(credential) {
                return false;
            }
        }
        if self.activity == ActivityType::Procedures && !person.performs_procedures() {
            return false;
        }
        true
    }

    /// True if the template takes assignments on the given date.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        match &self.weekdays {
            Some(days) => days.contains(&date.weekday()),
            None => true,
        }
    }
}
