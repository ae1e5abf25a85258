//! Domain entities, invariants, and per-run lookup indices.
//!
//! Entities are immutable value-like snapshots borrowed from the
//! repository for the duration of one scheduling run. Cross-entity links
//! are id lookups through [`RunIndex`], never owning pointers. Mutation
//! happens only by emitting new [`Assignment`]s back to the caller.

pub mod absence;
pub mod assignment;
pub mod block;
pub mod error;
pub mod indices;
pub mod person;
pub mod template;

pub use absence::{Absence, AbsenceKind};
pub use assignment::{Assignment, Role};
pub use block::{Block, DateWindow, HalfDay};
pub use error::DomainError;
pub use indices::RunIndex;
pub use person::{Person, PersonKind, PgyLevel};
pub use template::{ActivityType, RotationTemplate, SupervisionRule};
