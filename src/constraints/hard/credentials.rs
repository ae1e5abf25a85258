//! Credential gating.

use crate::constraints::{CandidateSlot, Decision, ScheduleState, SchedulingConstraint};

/// Forbids assigning a person to a template whose credential or
/// procedures requirements they do not meet.
#[derive(Debug, Default, Clone, Copy)]
pub struct CredentialRequirement;

impl SchedulingConstraint for CredentialRequirement {
    fn name(&self) -> &'static str {
        "credential_requirement"
    }

    fn weight(&self) -> f64 {
        f64::INFINITY
    }

    fn propagate(&self, candidate: &CandidateSlot, state: &ScheduleState<'_>) -> Decision {
        let (Some(person), Some(template)) = (
            state.person(&candidate.person_id),
            state.template(&candidate.template_id),
        ) else {
            return Decision::Allowed;
        };
        if template.accepts(person) {
            Decision::Allowed
        } else {
            Decision::Forbidden(format!(
                "{} lacks the credentials required by {}",
                candidate.person_id,
                template.name()
            ))
        }
    }
}
