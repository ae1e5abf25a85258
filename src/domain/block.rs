//! Scheduling atoms: half-day blocks and date windows.

use chrono::NaiveDate;

use super::error::DomainError;
use crate::Id;

/// Half of a scheduling day. AM precedes PM on the same date.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HalfDay {
    Am,
    Pm,
}

/// A single (date, half-of-day) scheduling atom.
///
/// Each block belongs to exactly one academic block number. Uniqueness of
/// (date, half) across a run is enforced when [`RunIndex`] is built, not
/// here.
///
/// [`RunIndex`]: super::indices::RunIndex
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: Id,
    date: NaiveDate,
    half: HalfDay,
    number: u32,
}

impl Block {
    pub fn new(id: impl Into<Id>, date: NaiveDate, half: HalfDay, number: u32) -> Self {
        Self {
            id: id.into(),
            date,
            half,
            number,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn half(&self) -> HalfDay {
        self.half
    }

    /// Academic block number this atom belongs to.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Total-order key: date first, then AM before PM.
    pub fn key(&self) -> (NaiveDate, HalfDay) {
        (self.date, self.half)
    }
}

/// Inclusive date window for a scheduling run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days in the window, inclusive of both endpoints.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterates the dates of the window in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.num_days()).map(move |offset| start + chrono::Days::new(offset as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn am_sorts_before_pm() {
        assert!(HalfDay::Am < HalfDay::Pm);
        let am = Block::new("b1", date(2025, 6, 2), HalfDay::Am, 10);
        let pm = Block::new("b2", date(2025, 6, 2), HalfDay::Pm, 10);
        assert!(am.key() < pm.key());
    }

    #[test]
    fn window_rejects_reversed_bounds() {
        let err = DateWindow::new(date(2025, 6, 30), date(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidWindow { .. }));
    }

    #[test]
    fn window_days_iterates_inclusive() {
        let w = DateWindow::new(date(2025, 6, 2), date(2025, 6, 4)).unwrap();
        let days: Vec<_> = w.days().collect();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0], date(2025, 6, 2));
        assert_eq!(days[2], date(2025, 6, 4));
        assert!(w.contains(date(2025, 6, 3)));
        assert!(!w.contains(date(2025, 6, 5)));
    }
}
