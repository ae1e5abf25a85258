//! Absences: inclusive date ranges during which a person is unavailable.

use chrono::NaiveDate;

use super::error::DomainError;
use crate::Id;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbsenceKind {
    Vacation,
    Sick,
    Conference,
    Other,
}

/// A person's absence over an inclusive date range.
///
/// Treated as preserved non-productive occupancy: both halves of every
/// day in the range are blocked for the person.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Absence {
    person_id: Id,
    start: NaiveDate,
    end: NaiveDate,
    kind: AbsenceKind,
}

impl Absence {
    pub fn new(
        person_id: impl Into<Id>,
        start: NaiveDate,
        end: NaiveDate,
        kind: AbsenceKind,
    ) -> Result<Self, DomainError> {
        let person_id = person_id.into();
        if start > end {
            return Err(DomainError::InvalidAbsence {
                person: person_id,
                start,
                end,
            });
        }
        Ok(Self {
            person_id,
            start,
            end,
            kind,
        })
    }

    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn kind(&self) -> AbsenceKind {
        self.kind
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn covers_is_inclusive() {
        let a = Absence::new("r1", date(10), date(12), AbsenceKind::Vacation).unwrap();
        assert!(a.covers(date(10)));
        assert!(a.covers(date(12)));
        assert!(!a.covers(date(13)));
    }

    #[test]
    fn reversed_range_rejected() {
        let err = Absence::new("r1", date(12), date(10), AbsenceKind::Sick).unwrap_err();
        assert!(matches!(err, DomainError::InvalidAbsence { .. }));
    }
}
