use thiserror::Error;

/// Errors from constraint manager registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("no constraint registered under name {0:?}")]
    UnknownConstraint(String),

    #[error("a constraint named {0:?} is already registered")]
    DuplicateConstraint(String),
}
