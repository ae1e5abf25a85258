//! Injection seams for logging, metrics, time, and cancellation.
//!
//! The core holds no process-wide state: the facade owns one sink of
//! each kind and nothing reads the clock or environment except through
//! them. Defaults are no-ops so a bare engine stays deterministic and
//! silent.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

/// Receives log events from the core.
pub trait LogSink: Send + Sync + Debug {
    fn event(&self, level: LogLevel, message: &str);
}

/// Receives named metric samples from the core.
pub trait MetricsSink: Send + Sync + Debug {
    fn record(&self, name: &str, value: f64);
}

/// Monotonic time source for deadlines.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Instant;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLog;

impl LogSink for NoopLog {
    fn event(&self, _level: LogLevel, _message: &str) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record(&self, _name: &str, _value: f64) {}
}

/// Forwards log events to the `tracing` subscriber of the host process.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn event(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "rotacore", "{message}"),
            LogLevel::Info => tracing::info!(target: "rotacore", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "rotacore", "{message}"),
        }
    }
}

/// Wall clock of the host process.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Cooperative cancellation handle.
///
/// Cloneable; the caller keeps one clone and cancels from wherever its
/// concurrency layer lives. The core only polls, it never blocks on the
/// token, so no particular runtime is presumed.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Per-run time budget: cancellation token plus an optional deadline.
///
/// Backends poll [`RunBudget::check`] between iterations; the validator
/// and analyzer poll it per resident or per block.
#[derive(Debug, Clone)]
pub struct RunBudget {
    token: CancelToken,
    deadline: Option<Instant>,
}

/// Why a poll of the budget asked the caller to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStop {
    Cancelled,
    DeadlineExceeded,
}

impl RunBudget {
    pub fn new(token: CancelToken, deadline: Option<Instant>) -> Self {
        Self { token, deadline }
    }

    /// Budget with no deadline and a token nobody cancels.
    pub fn unbounded() -> Self {
        Self {
            token: CancelToken::new(),
            deadline: None,
        }
    }

    pub fn from_timeout(token: CancelToken, clock: &dyn Clock, timeout: Option<Duration>) -> Self {
        Self {
            token,
            deadline: timeout.map(|t| clock.now() + t),
        }
    }

    /// Returns the stop reason if the run should end now. Cancellation
    /// wins over the deadline when both apply.
    pub fn check(&self, clock: &dyn Clock) -> Option<BudgetStop> {
        if self.token.is_cancelled() {
            return Some(BudgetStop::Cancelled);
        }
        match self.deadline {
            Some(deadline) if clock.now() >= deadline => Some(BudgetStop::DeadlineExceeded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_clear_and_latches() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancellation_wins_over_deadline() {
        let token = CancelToken::new();
        token.cancel();
        let clock = SystemClock;
        let budget = RunBudget::new(token, Some(clock.now()));
        assert_eq!(budget.check(&clock), Some(BudgetStop::Cancelled));
    }

    #[test]
    fn unbounded_budget_never_stops() {
        let budget = RunBudget::unbounded();
        assert_eq!(budget.check(&SystemClock), None);
    }
}
