//! Progress reporting and cancellation for long bootstrap runs
//!
//! Observers are notified once per completed bootstrap iteration from
//! whichever worker finished it, so implementations must be `Send + Sync`.
//! A single observer may be shared across many pairwise tests to report on a
//! whole multi-model comparison.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

/// Observer of bootstrap progress
pub trait ProgressObserver: Send + Sync {
    /// Called once per completed bootstrap iteration
    fn on_iteration(&self);
}

/// Shared handle to a progress observer
pub type SharedProgress = Arc<dyn ProgressObserver>;

/// Atomic iteration counter with an expected total
#[derive(Debug, Default)]
pub struct ProgressCounter {
    completed: AtomicUsize,
    total: usize,
}

impl ProgressCounter {
    /// Create a counter expecting `total` iterations
    pub fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
        }
    }

    /// Number of iterations completed so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Expected number of iterations
    pub fn total(&self) -> usize {
        self.total
    }

    /// Completed fraction in [0, 1]; an empty run counts as done
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.completed() as f64 / self.total as f64).min(1.0)
    }
}

impl ProgressObserver for ProgressCounter {
    fn on_iteration(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Counter that emits a `tracing` event every `every` iterations
#[derive(Debug)]
pub struct TracingProgress {
    label: String,
    every: usize,
    counter: ProgressCounter,
}

impl TracingProgress {
    /// Create a reporter for `total` iterations that logs every `every` steps
    pub fn new(label: impl Into<String>, total: usize, every: usize) -> Self {
        Self {
            label: label.into(),
            every: every.max(1),
            counter: ProgressCounter::new(total),
        }
    }

    /// Underlying counter
    pub fn counter(&self) -> &ProgressCounter {
        &self.counter
    }
}

impl ProgressObserver for TracingProgress {
    fn on_iteration(&self) {
        let done = self.counter.completed.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.every == 0 || done == self.counter.total {
            info!(
                label = %self.label,
                completed = done,
                total = self.counter.total,
                "bootstrap progress"
            );
        }
    }
}

/// Cooperative cancellation flag for a bootstrap run
///
/// Cloning shares the flag. Once raised, remaining iterations are skipped and
/// the run reports `Error::Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Create a lowered flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
