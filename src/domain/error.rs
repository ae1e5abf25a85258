use chrono::NaiveDate;
use thiserror::Error;

use super::block::HalfDay;
use crate::Id;

/// Invariant violations in scheduling inputs.
///
/// These are caller bugs: the facade returns them without modifying
/// anything, never as a partial result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("person {person} already holds an assignment on block {block}")]
    DuplicateAssignment { person: Id, block: Id },

    #[error("duplicate block for {date} {half:?}")]
    DuplicateBlock { date: NaiveDate, half: HalfDay },

    #[error("assignment references unknown person {0}")]
    UnknownPerson(Id),

    #[error("assignment references unknown block {0}")]
    UnknownBlock(Id),

    #[error("assignment references unknown template {0}")]
    UnknownTemplate(Id),

    #[error("window start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("absence for {person} has start {start} after end {end}")]
    InvalidAbsence {
        person: Id,
        start: NaiveDate,
        end: NaiveDate,
    },
}
