//! # Exponential Backoff
//!
//! Retry delays handed back to the scheduler when a reconciliation pass fails.
//! Each consecutive failure of the same Web doubles the delay, starting at the
//! base and capped at the maximum. A successful pass resets the count.
//!
//! Default sequence: 1s, 2s, 4s, 8s, ... 300s (max).
//!
//! The reconciler never sleeps or retries on its own; this only feeds
//! `Action::requeue` in the error policy.
//!
//! A Web deleted while failing is never reconciled again, so its count would
//! never be reset. Entries idle for more than twice the maximum delay are
//! dropped whenever a failure is recorded.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Exponential backoff calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    base: Duration,
    max: Duration,
}

impl ExponentialBackoff {
    /// Create a new backoff with the delay for the first failure and the cap
    #[must_use]
    pub fn new(base: Duration, max: Duration) -> Self {
        Self { base, max }
    }

    /// Delay after `error_count` consecutive failures (1-indexed; 0 is treated as 1)
    ///
    /// Returns `base * 2^(error_count - 1)`, capped at `max`.
    #[must_use]
    pub fn delay_for(&self, error_count: u32) -> Duration {
        let exponent = error_count.saturating_sub(1).min(31);
        self.base
            .checked_mul(1u32 << exponent)
            .map_or(self.max, |delay| delay.min(self.max))
    }
}

#[derive(Debug, Clone, Copy)]
struct FailureState {
    count: u32,
    last_failure: Instant,
}

/// Consecutive failure counts per resource key (`namespace/name`)
#[derive(Debug)]
pub struct BackoffTracker {
    backoff: ExponentialBackoff,
    error_counts: Mutex<HashMap<String, FailureState>>,
}

impl BackoffTracker {
    pub fn new(backoff: ExponentialBackoff) -> Self {
        Self {
            backoff,
            error_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Record a failure for `resource_key` and return how long to wait before retrying
    ///
    /// Returns (delay, error_count)
    pub fn record_failure(&self, resource_key: &str) -> (Duration, u32) {
        self.record_failure_at(resource_key, Instant::now())
    }

    fn record_failure_at(&self, resource_key: &str, now: Instant) -> (Duration, u32) {
        let retention = self.backoff.max.saturating_mul(2);
        let mut counts = self.error_counts.lock().unwrap_or_else(PoisonError::into_inner);
        counts.retain(|key, state| {
            key == resource_key || now.saturating_duration_since(state.last_failure) <= retention
        });

        let state = counts
            .entry(resource_key.to_string())
            .or_insert(FailureState { count: 0, last_failure: now });
        state.count = state.count.saturating_add(1);
        state.last_failure = now;
        (self.backoff.delay_for(state.count), state.count)
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.error_counts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Reset error count for a resource (on successful reconciliation)
    pub fn reset(&self, resource_key: &str) {
        self.error_counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(resource_key);
    }
}
