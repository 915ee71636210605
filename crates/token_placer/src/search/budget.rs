//! Effort limits shared by all strategies: wall-clock time, stagnation, cancellation.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::search::StopReason;

/// Cooperative cancellation flag, cheap to clone and share across threads.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that every run observing this token stops after its current iteration.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Limits applied on top of a strategy's own iteration count.
///
/// The default imposes none, so a run always performs its full iteration budget.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchBudget {
    /// Stop once this much wall-clock time has passed.
    pub time_limit: Option<Duration>,
    /// Stop after this many consecutive iterations without improving the best cost.
    pub stagnation_limit: Option<usize>,
    /// Stop when the token is cancelled. Runtime-only, never serialized.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub cancellation: Option<CancellationToken>,
}

impl SearchBudget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Enables early stopping after `iterations` without improvement.
    pub fn with_stagnation_limit(mut self, iterations: usize) -> Self {
        self.stagnation_limit = Some(iterations);
        self
    }

    /// Observes `token` for cooperative cancellation.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Validates the budget, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.stagnation_limit == Some(0) {
            return Err(Error::InvalidConfig("stagnation_limit must be > 0".into()));
        }
        Ok(())
    }
}

/// Per-run bookkeeping against a [`SearchBudget`].
pub(crate) struct BudgetTracker<'a> {
    budget: &'a SearchBudget,
    started: Instant,
    stale_iterations: usize,
}

impl<'a> BudgetTracker<'a> {
    pub(crate) fn start(budget: &'a SearchBudget) -> Self {
        Self {
            budget,
            started: Instant::now(),
            stale_iterations: 0,
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Checked before each iteration.
    pub(crate) fn interrupted(&self) -> Option<StopReason> {
        if self
            .budget
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Some(StopReason::Cancelled);
        }
        if self
            .budget
            .time_limit
            .is_some_and(|limit| self.started.elapsed() >= limit)
        {
            return Some(StopReason::TimeLimit);
        }
        None
    }

    /// Checked after each iteration.
    pub(crate) fn record_iteration(&mut self, improved: bool) -> Option<StopReason> {
        if improved {
            self.stale_iterations = 0;
        } else {
            self.stale_iterations += 1;
        }
        match self.budget.stagnation_limit {
            Some(limit) if self.stale_iterations >= limit => Some(StopReason::Stagnated),
            _ => None,
        }
    }
}
