//! Hard rules: infinite weight, prune candidates during propagation.
//!
//! All of these ship enabled from the default factory; callers may
//! disable them individually through the manager.

mod absence;
mod call_cap;
mod credentials;
mod day_off;
mod fmit;
mod inpatient;
mod supervision;
mod uniqueness;

pub use absence::AbsenceRespect;
pub use call_cap::MaxConsecutiveCallCap;
pub use credentials::CredentialRequirement;
pub use day_off::OneDayOffIn7;
pub use fmit::{PostFmitRecovery, PostFmitSundayBlocking};
pub use inpatient::ResidentInpatientHeadcount;
pub use supervision::SupervisionRatio;
pub use uniqueness::UniqueAssignmentPerBlock;

use super::manager::RuleConfig;
use super::SchedulingConstraint;

/// The full hard rule set in registry order.
pub fn all(config: &RuleConfig) -> Vec<Box<dyn SchedulingConstraint>> {
    vec![
        Box::new(UniqueAssignmentPerBlock),
        Box::new(AbsenceRespect),
        Box::new(CredentialRequirement),
        Box::new(SupervisionRatio),
        Box::new(ResidentInpatientHeadcount),
        Box::new(PostFmitRecovery),
        Box::new(PostFmitSundayBlocking),
        Box::new(MaxConsecutiveCallCap::new(config.max_consecutive_call)),
        Box::new(OneDayOffIn7),
    ]
}
