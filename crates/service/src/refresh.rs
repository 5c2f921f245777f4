//! Dashboard refresh gating.
//!
//! Metric recomputation can be triggered both by a timer and by user
//! actions. The gate guarantees that refreshes never overlap: a trigger
//! that arrives while one is running is skipped, not queued.

use std::sync::atomic::{AtomicBool, Ordering};

/// One refresh in flight at a time.
#[derive(Debug, Default)]
pub struct RefreshGate {
    busy: AtomicBool,
}

/// Outcome of a [`RefreshGate::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome<T> {
    Completed(T),
    Skipped,
}

impl<T> RefreshOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            RefreshOutcome::Completed(value) => Some(value),
            RefreshOutcome::Skipped => None,
        }
    }
}

struct ResetOnDrop<'a>(&'a AtomicBool);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `refresh` unless one is already in flight.
    ///
    /// The busy flag is released when the closure returns, including by
    /// panic, so a failed refresh never wedges the gate shut.
    pub fn run<T>(&self, refresh: impl FnOnce() -> T) -> RefreshOutcome<T> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return RefreshOutcome::Skipped;
        }
        let _reset = ResetOnDrop(&self.busy);
        RefreshOutcome::Completed(refresh())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}
