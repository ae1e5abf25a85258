//! Resilience analysis: utilization, contingency, burnout cascade.
//!
//! Every analysis is a pure function of the assignment universe it is
//! given; nothing here mutates schedule state. Backfill feasibility
//! reuses the constraint manager in propagation-only mode so the
//! contingency answers agree with what the solver would actually
//! permit.

pub mod burnout;
pub mod contingency;
pub mod report;
pub mod utilization;

pub use report::{
    BlockUtilization, BurnoutReport, DefenseLevel, PairResilience, PersonResilience,
    ResilienceReport, TemplateUtilizationPoint, TemplateUtilizationSeries, UtilizationReport,
};

use crate::constraints::ConstraintManager;
use crate::domain::RunIndex;
use crate::sink::{Clock, RunBudget};

/// How deep the contingency analysis goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisDepth {
    UtilizationOnly,
    N1,
    /// N-1 plus pair analysis bounded to this many pairs.
    N2 { pair_cap: usize },
}

/// The resilience analyzer.
#[derive(Debug, Default)]
pub struct ResilienceAnalyzer;

impl ResilienceAnalyzer {
    /// Runs the analysis at the requested depth.
    pub fn analyze(
        &self,
        index: &RunIndex<'_>,
        manager: &ConstraintManager,
        depth: AnalysisDepth,
        budget: &RunBudget,
        clock: &dyn Clock,
    ) -> ResilienceReport {
        let mut report = ResilienceReport {
            utilization: utilization::analyze(index),
            ..ResilienceReport::default()
        };

        if depth == AnalysisDepth::UtilizationOnly {
            return report;
        }

        let (n1, truncated) = contingency::analyze_n1(index, manager, budget, clock);
        report.truncated |= truncated;
        report.single_points_of_failure = n1
            .iter()
            .filter(|r| r.is_spof())
            .map(|r| r.person_id.clone())
            .collect();

        if let AnalysisDepth::N2 { pair_cap } = depth {
            if !report.truncated {
                let (pairs, truncated) =
                    contingency::analyze_n2(index, manager, &n1, pair_cap, budget, clock);
                report.truncated |= truncated;
                report.n2 = Some(pairs);
            }
        }
        report.n1 = Some(n1);
        report
    }

    /// SIR-style burnout cascade estimate over the same universe.
    pub fn burnout_cascade(&self, index: &RunIndex<'_>) -> BurnoutReport {
        burnout::estimate(index)
    }
}
