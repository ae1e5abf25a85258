//! Ordered, name-keyed constraint registry.

use super::error::ConstraintError;
use super::state::ScheduleState;
use super::{CandidateSlot, Decision, SchedulingConstraint};

/// Tuning knobs for the built-in rules.
///
/// Weights follow the operational defaults of the resilience-aware
/// profile; the rules themselves stay disabled until a factory or the
/// caller enables them.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    pub hub_protection_weight: f64,
    pub utilization_buffer_weight: f64,
    pub zone_boundary_weight: f64,
    pub preference_trail_weight: f64,
    pub n1_vulnerability_weight: f64,
    pub fairness_by_pgy_weight: f64,
    /// Ceiling on consecutive on-call half-days.
    pub max_consecutive_call: u32,
    /// Block utilization above this draws a penalty.
    pub utilization_threshold: f64,
    /// Days of history the continuity rule looks back over.
    pub continuity_lookback_days: u64,
    /// Coverage-graph centrality above this marks a hub.
    pub hub_centrality_threshold: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            hub_protection_weight: 15.0,
            utilization_buffer_weight: 20.0,
            zone_boundary_weight: 12.0,
            preference_trail_weight: 8.0,
            n1_vulnerability_weight: 25.0,
            fairness_by_pgy_weight: 10.0,
            max_consecutive_call: 6,
            utilization_threshold: 0.8,
            continuity_lookback_days: 7,
            hub_centrality_threshold: 0.5,
        }
    }
}

/// A candidate removed by hard propagation, with the rule that removed
/// it. Part of the run diagnostics.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCandidate {
    pub slot: CandidateSlot,
    pub constraint: String,
    pub reason: String,
}

struct Entry {
    rule: Box<dyn SchedulingConstraint>,
    enabled: bool,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.rule.name())
            .field("weight", &self.rule.weight())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Owns the rule set for one run.
///
/// Rules keep their insertion order; `filter` consults them in that
/// order and attributes each drop to the first rule that forbids the
/// candidate. The manager is owned by a run and never shared across
/// runs.
#[derive(Debug, Default)]
pub struct ConstraintManager {
    entries: Vec<Entry>,
}

impl ConstraintManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hard rules plus PGY fairness; the standard production profile.
    pub fn default_set(config: &RuleConfig) -> Self {
        let mut manager = Self::new();
        for rule in super::hard::all(config) {
            manager.push(rule, true);
        }
        manager.push(
            Box::new(super::soft::FairnessByPgy::new(config.fairness_by_pgy_weight)),
            true,
        );
        for rule in super::soft::resilience_rules(config) {
            manager.push(rule, false);
        }
        manager
    }

    /// The default profile with the five resilience rules enabled.
    pub fn resilience_aware(config: &RuleConfig) -> Self {
        let mut manager = Self::default_set(config);
        for name in super::soft::RESILIENCE_RULE_NAMES {
            manager.enable(name).ok();
        }
        manager
    }

    fn push(&mut self, rule: Box<dyn SchedulingConstraint>, enabled: bool) {
        self.entries.push(Entry { rule, enabled });
    }

    /// Registers a rule at the end of the order. Fails on a name clash.
    pub fn add(&mut self, rule: Box<dyn SchedulingConstraint>) -> Result<(), ConstraintError> {
        if self.entries.iter().any(|e| e.rule.name() == rule.name()) {
            return Err(ConstraintError::DuplicateConstraint(rule.name().to_owned()));
        }
        self.push(rule, true);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<(), ConstraintError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.rule.name() != name);
        if self.entries.len() == before {
            return Err(ConstraintError::UnknownConstraint(name.to_owned()));
        }
        Ok(())
    }

    pub fn enable(&mut self, name: &str) -> Result<(), ConstraintError> {
        self.set_enabled(name, true)
    }

    pub fn disable(&mut self, name: &str) -> Result<(), ConstraintError> {
        self.set_enabled(name, false)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), ConstraintError> {
        for entry in &mut self.entries {
            if entry.rule.name() == name {
                entry.enabled = enabled;
                return Ok(());
            }
        }
        Err(ConstraintError::UnknownConstraint(name.to_owned()))
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.enabled && e.rule.name() == name)
    }

    /// Registered rule names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.rule.name())
    }

    /// Runs hard propagation for one candidate. The first enabled hard
    /// rule that forbids wins; soft rules never forbid.
    pub fn propagate(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> Decision {
        for entry in &self.entries {
            if !entry.enabled || !entry.rule.is_hard() {
                continue;
            }
            if let Decision::Forbidden(reason) = entry.rule.propagate(candidate, state) {
                return Decision::Forbidden(reason);
            }
        }
        Decision::Allowed
    }

    /// Like [`propagate`](Self::propagate), naming the rule that forbade.
    pub fn propagate_named(
        &self,
        candidate: &CandidateSlot,
        state: &ScheduleState<'_>,
    ) -> Result<(), DroppedCandidate> {
        for entry in &self.entries {
            if !entry.enabled || !entry.rule.is_hard() {
                continue;
            }
            if let Decision::Forbidden(reason) = entry.rule.propagate(candidate, state) {
                return Err(DroppedCandidate {
                    slot: candidate.clone(),
                    constraint: entry.rule.name().to_owned(),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Drops forbidden candidates, keeping input order, and records why
    /// each dropped one fell.
    pub fn filter(
        &self,
        candidates: Vec<CandidateSlot>,
        state: &ScheduleState<'_>,
    ) -> (Vec<CandidateSlot>, Vec<DroppedCandidate>) {
        let mut kept = Vec::with_capacity(candidates.len());
        let mut dropped = Vec::new();
        for candidate in candidates {
            match self.propagate_named(&candidate, state) {
                Ok(()) => kept.push(candidate),
                Err(drop) => dropped.push(drop),
            }
        }
        (kept, dropped)
    }

    /// Weighted soft cost of placing the candidate: Σ weightᵢ · scoreᵢ
    /// over enabled finite-weight rules.
    pub fn cost(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.enabled && !e.rule.is_hard())
            .map(|e| e.rule.weight() * e.rule.score(candidate, state))
            .sum()
    }
}
