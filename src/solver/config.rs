//! Solve configuration.

use std::time::Duration;

use crate::constraints::RuleConfig;

/// Solver backend selection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Greedy,
    MinConflicts,
    CpSat,
}

impl Algorithm {
    /// Stable backend name; part of the diagnostics contract.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::MinConflicts => "min_conflicts",
            Self::CpSat => "cp_sat",
        }
    }
}

/// Value-type configuration for one scheduling run.
///
/// Passed into the facade with the context; nothing here is read from
/// the environment.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    pub algorithm: Algorithm,
    /// Seed for stochastic backends. The greedy backend ignores it.
    pub seed: u64,
    /// Wall-clock budget for the run; `None` means unbounded.
    pub timeout: Option<Duration>,
    /// Rule weights and thresholds.
    pub rules: RuleConfig,
    /// Enable the resilience-aware constraint profile.
    pub resilience_aware: bool,
    /// Repair step budget for the min-conflicts backend.
    pub min_conflicts_steps: u32,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Greedy,
            seed: 0,
            timeout: None,
            rules: RuleConfig::default(),
            resilience_aware: false,
            min_conflicts_steps: 200,
        }
    }
}
