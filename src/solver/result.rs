//! Scheduling run output.

use crate::constraints::DroppedCandidate;
use crate::domain::Assignment;

/// Terminal status of a scheduling run.
///
/// Operational outcomes are statuses, never errors: infeasibility,
/// timeouts, and cancellation all land here.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Every required slot is covered.
    Success,
    /// The solver returned but uncovered slots remain.
    Partial,
    /// No solution exists under the hard constraints.
    Infeasible,
    /// The wall-clock budget ran out first.
    Timeout,
    /// The caller's token fired first.
    Cancelled,
}

impl SolveStatus {
    /// Stable status string; part of the diagnostics contract.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Infeasible => "infeasible",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Run statistics and diagnostics.
///
/// Deliberately free of wall-clock readings so identical inputs produce
/// byte-identical results.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolverStats {
    /// Backend that produced the accepted solution.
    pub backend_used: String,
    /// Why the requested backend was abandoned, when it was.
    pub backend_failure_reason: Option<String>,
    pub candidates_generated: usize,
    pub candidates_dropped: usize,
    pub selected: usize,
    pub supervision_added: usize,
    pub iterations: u64,
    /// Weighted soft cost of the accepted solution.
    pub cost: f64,
    /// Hard rule the preserved inputs already violate, when they do.
    pub infeasible_constraint: Option<String>,
    /// (block, template) slots left below required coverage.
    pub uncovered_slots: usize,
}

impl Default for SolverStats {
    fn default() -> Self {
        Self {
            backend_used: String::new(),
            backend_failure_reason: None,
            candidates_generated: 0,
            candidates_dropped: 0,
            selected: 0,
            supervision_added: 0,
            iterations: 0,
            cost: 0.0,
            infeasible_constraint: None,
            uncovered_slots: 0,
        }
    }
}

/// The full output of one run: new assignments plus diagnostics.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulingResult {
    pub status: SolveStatus,
    /// Newly produced assignments. Empty unless status is `Success` or
    /// `Partial` — the pipeline is all-or-nothing within a run.
    pub assignments: Vec<Assignment>,
    /// Candidates removed by hard propagation, in generation order.
    pub dropped: Vec<DroppedCandidate>,
    pub stats: SolverStats,
}

impl SchedulingResult {
    pub(crate) fn empty(status: SolveStatus, stats: SolverStats) -> Self {
        Self {
            status,
            assignments: Vec::new(),
            dropped: Vec::new(),
            stats,
        }
    }
}
