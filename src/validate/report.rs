//! Validation report types.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::Id;

/// Violation severity. Variant order is the sort order: report
/// violations list Critical first.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// ACGME rule behind a violation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    EightyHour,
    OneInSeven,
    SupervisionRatio,
    ConsecutiveDuty,
}

impl ViolationKind {
    /// Stable violation type string; callers pattern-match on it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EightyHour => "80_HOUR",
            Self::OneInSeven => "1_IN_7",
            Self::SupervisionRatio => "SUPERVISION_RATIO",
            Self::ConsecutiveDuty => "CONSECUTIVE_DUTY",
        }
    }

    /// Fixed severity mapping: duty-hour and supervision breaches are
    /// Critical, rest rules are High.
    pub fn severity(self) -> Severity {
        match self {
            Self::EightyHour | Self::SupervisionRatio => Severity::Critical,
            Self::OneInSeven | Self::ConsecutiveDuty => Severity::High,
        }
    }
}

/// One rule breach with its structured details.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub person_id: Option<Id>,
    pub block_id: Option<Id>,
    /// Start of the rolling window (or run) that failed.
    pub window_start: Option<NaiveDate>,
    pub message: String,
    /// Measured value: average weekly hours, run length, headcount.
    pub observed: f64,
    /// The rule's ceiling for the measured value.
    pub limit: f64,
}

impl Violation {
    /// Deterministic report order: severity, then person, then window.
    pub(crate) fn sort_key(&self) -> (Severity, Id, Option<NaiveDate>, Id) {
        (
            self.severity,
            self.person_id.clone().unwrap_or_default(),
            self.window_start,
            self.block_id.clone().unwrap_or_default(),
        )
    }
}

/// Aggregate statistics over a validation pass.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationStats {
    pub residents_checked: usize,
    pub blocks_checked: usize,
    /// Violation counts keyed by stable kind string.
    pub counts: BTreeMap<String, usize>,
    /// Fraction of required (block, template) coverage that is filled.
    pub coverage_rate: f64,
}

/// The full validator output.
///
/// Pure function of its input: identical assignments produce identical
/// reports, violations ordered by severity, person, then window start.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub stats: ValidationStats,
    /// Set when cancellation stopped the pass early.
    pub truncated: bool,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count_of(&self, kind: ViolationKind) -> usize {
        self.stats.counts.get(kind.as_str()).copied().unwrap_or(0)
    }
}
