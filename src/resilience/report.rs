//! Resilience report types.

use chrono::NaiveDate;

use crate::domain::HalfDay;
use crate::Id;

/// Five-bin categorization of overall utilization stress.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DefenseLevel {
    Green,
    Yellow,
    Orange,
    Red,
    Black,
}

impl DefenseLevel {
    /// Bins: Green < 0.6, Yellow 0.6–0.8, Orange 0.8–0.9, Red
    /// 0.9–0.95, Black above.
    pub fn from_utilization(utilization: f64) -> Self {
        if utilization < 0.6 {
            Self::Green
        } else if utilization <= 0.8 {
            Self::Yellow
        } else if utilization <= 0.9 {
            Self::Orange
        } else if utilization <= 0.95 {
            Self::Red
        } else {
            Self::Black
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Black => "black",
        }
    }
}

/// Utilization of a single block.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BlockUtilization {
    pub block_id: Id,
    pub date: NaiveDate,
    pub half: HalfDay,
    pub assigned: u32,
    pub capacity: u32,
    pub utilization: f64,
}

/// One point of a per-template utilization time series.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateUtilizationPoint {
    pub date: NaiveDate,
    pub utilization: f64,
}

/// Per-template utilization over the window.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateUtilizationSeries {
    pub template_id: Id,
    pub points: Vec<TemplateUtilizationPoint>,
}

/// Utilization sub-analysis output.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UtilizationReport {
    pub mean: f64,
    /// Blocks in (date, half) order.
    pub per_block: Vec<BlockUtilization>,
    /// Blocks past the queueing threshold (0.8).
    pub flagged_blocks: Vec<Id>,
    pub per_template: Vec<TemplateUtilizationSeries>,
    pub defense_level: Option<DefenseLevel>,
}

/// N-1 robustness of one person.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PersonResilience {
    pub person_id: Id,
    pub covered_blocks: u32,
    /// Blocks nobody else could absorb, in (date, half) order.
    pub uncoverable_blocks: Vec<Id>,
    /// max(0, 1 − uncoverable/covered); zero marks a single point of
    /// failure.
    pub score: f64,
}

impl PersonResilience {
    pub fn is_spof(&self) -> bool {
        self.covered_blocks > 0 && self.score == 0.0
    }
}

/// N-2 robustness of an unordered pair.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PairResilience {
    pub first_id: Id,
    pub second_id: Id,
    pub covered_blocks: u32,
    pub uncoverable_blocks: Vec<Id>,
    pub score: f64,
}

/// Burnout cascade estimate (SIR-style).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BurnoutReport {
    /// Estimated reproduction number of overload spread.
    pub r_t: f64,
    /// People past the overload threshold, in id order.
    pub overloaded: Vec<Id>,
    /// People within contagion range of an overloaded colleague.
    pub at_risk: Vec<Id>,
}

/// The full analyzer output.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResilienceReport {
    pub utilization: UtilizationReport,
    /// Per-person N-1 scores in person-id order; present at depth N1+.
    pub n1: Option<Vec<PersonResilience>>,
    /// Ids of single points of failure, in id order.
    pub single_points_of_failure: Vec<Id>,
    /// Pair analysis; present at depth N2.
    pub n2: Option<Vec<PairResilience>>,
    /// Set when cancellation stopped the analysis early.
    pub truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defense_level_bins() {
        assert_eq!(DefenseLevel::from_utilization(0.0), DefenseLevel::Green);
        assert_eq!(DefenseLevel::from_utilization(0.59), DefenseLevel::Green);
        assert_eq!(DefenseLevel::from_utilization(0.6), DefenseLevel::Yellow);
        assert_eq!(DefenseLevel::from_utilization(0.8), DefenseLevel::Yellow);
        assert_eq!(DefenseLevel::from_utilization(0.85), DefenseLevel::Orange);
        assert_eq!(DefenseLevel::from_utilization(0.92), DefenseLevel::Red);
        assert_eq!(DefenseLevel::from_utilization(0.96), DefenseLevel::Black);
    }
}
