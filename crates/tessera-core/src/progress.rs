//! Progress reporting and cooperative cancellation
//!
//! Engines poll a [`Progress`] once per plane or tile, never finer.
//! Implementations must be cheap and must not block.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Progress and cancellation collaborator passed into long-running operations.
///
/// The trait is `Sync` because engines call it from parallel workers.
pub trait Progress: Sync {
    /// Report that `done` of `total` work units have finished.
    fn report(&self, _done: usize, _total: usize) {}

    /// Whether the caller asked the running operation to stop.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Progress sink that ignores reports and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Stock [`Progress`] implementation.
///
/// Logs every report through `tracing` under a label, remembers the
/// highest completed count and exposes a cancellation flag that may be
/// raised from another thread.
#[derive(Debug, Default)]
pub struct ProgressInfo {
    label: String,
    cancelled: AtomicBool,
    done: AtomicUsize,
}

impl ProgressInfo {
    /// Create a progress tracker with a label used in log output.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            cancelled: AtomicBool::new(false),
            done: AtomicUsize::new(0),
        }
    }

    /// Request cancellation of the operation using this tracker.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Highest completed count reported so far.
    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    /// Label given at construction.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Progress for ProgressInfo {
    fn report(&self, done: usize, total: usize) {
        self.done.fetch_max(done, Ordering::Relaxed);
        tracing::trace!(label = %self.label, done, total, "progress");
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Counts finished units across parallel workers and forwards them.
#[derive(Debug)]
pub struct ProgressCounter<'a, P: Progress + ?Sized> {
    progress: &'a P,
    total: usize,
    done: AtomicUsize,
}

impl<'a, P: Progress + ?Sized> ProgressCounter<'a, P> {
    /// Create a counter for `total` units.
    pub fn new(progress: &'a P, total: usize) -> Self {
        Self {
            progress,
            total,
            done: AtomicUsize::new(0),
        }
    }

    /// Mark one unit as finished.
    pub fn step(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.progress.report(done, self.total);
    }

    /// Whether the underlying progress was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.progress.is_cancelled()
    }
}
