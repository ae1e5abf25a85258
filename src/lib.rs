//! rotacore - Rotation Assignment Core for residency scheduling
//!
//! A constraint-based scheduling engine producing and maintaining rotation
//! schedules for medical residency programs under ACGME and institutional
//! rules. The crate covers the solver pipeline, the pluggable constraint
//! library, the duty-hour compliance validator, and the resilience
//! analyzer. Persistence, transport, and task dispatch live in the caller
//! behind [`repository::ScheduleRepository`].

pub mod constraints;
pub mod domain;
pub mod engine;
pub mod repository;
pub mod resilience;
pub mod sink;
pub mod solver;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_utils;

pub use engine::{constraint_manager_default, constraint_manager_resilience_aware, ScheduleEngine};

/// Identifier type used for people, blocks, templates, and assignments.
pub type Id = String;

/// Generates a new unique identifier (UUID v4).
pub fn generate_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
