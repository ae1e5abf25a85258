use thiserror::Error;

/// Internal backend failure.
///
/// Never surfaces to the caller: the pipeline catches it, falls back to
/// the greedy backend, and records the reason in the run diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend failed: {0}")]
    Internal(String),
}
