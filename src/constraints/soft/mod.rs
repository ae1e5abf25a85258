//! Soft rules: finite weight, contribute to the composite cost.
//!
//! The five resilience rules ship registered but disabled; only the
//! resilience-aware factory turns them on. PGY fairness is part of the
//! default profile.

mod fairness;
mod hub;
mod preference;
mod utilization;
mod vulnerability;
mod zone;

pub use fairness::FairnessByPgy;
pub use hub::HubProtection;
pub use preference::PreferenceTrail;
pub use utilization::UtilizationBuffer;
pub use vulnerability::N1Vulnerability;
pub use zone::ZoneBoundary;

use super::manager::RuleConfig;
use super::SchedulingConstraint;

/// Names of the rules the resilience-aware factory enables.
pub const RESILIENCE_RULE_NAMES: [&str; 5] = [
    "hub_protection",
    "utilization_buffer",
    "zone_boundary",
    "preference_trail",
    "n1_vulnerability",
];

/// The resilience rule set in registry order.
pub fn resilience_rules(config: &RuleConfig) -> Vec<Box<dyn SchedulingConstraint>> {
    vec![
        Box::new(HubProtection::new(
            config.hub_protection_weight,
            config.hub_centrality_threshold,
        )),
        Box::new(UtilizationBuffer::new(
            config.utilization_buffer_weight,
            config.utilization_threshold,
        )),
        Box::new(ZoneBoundary::new(config.zone_boundary_weight)),
        Box::new(PreferenceTrail::new(
            config.preference_trail_weight,
            config.continuity_lookback_days,
        )),
        Box::new(N1Vulnerability::new(config.n1_vulnerability_weight)),
    ]
}
