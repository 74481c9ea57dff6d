use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::foundation::error::{PlysError, PlysResult};

#[derive(Debug, Default)]
struct Shared {
    total: AtomicUsize,
    processed: AtomicUsize,
    cancelled: AtomicBool,
}

/// Shared handle for observing and cancelling a build from another thread.
///
/// A control drives exactly one build; starting a second build on it (or on any clone of it) is
/// rejected with [`PlysError::InvalidState`]. Clones share the same counters. `processed` only
/// ever grows, so sampling it without a lock is safe; a reader may see a slightly stale value but
/// never a decreasing one.
#[derive(Clone, Debug, Default)]
pub struct BuildControl {
    shared: Arc<Shared>,
}

impl BuildControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(processed, total)`. `total` is zero until the build has validated its inputs.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.shared.processed.load(Ordering::Acquire),
            self.shared.total.load(Ordering::Acquire),
        )
    }

    /// Progress as a fraction in `0.0..=1.0`; `0.0` before the total is known.
    pub fn fraction(&self) -> f64 {
        let (processed, total) = self.progress();
        if total == 0 {
            0.0
        } else {
            processed as f64 / total as f64
        }
    }

    /// Ask the build to stop before the next frame. Frames already started are finished.
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }

    /// Claim the control for a build of `total` frames. `total` must be non-zero.
    pub(crate) fn begin(&self, total: usize) -> PlysResult<()> {
        self.shared
            .total
            .compare_exchange(0, total, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| PlysError::invalid_state("build control was already used for a build"))
    }

    pub(crate) fn frame_done(&self) -> usize {
        self.shared.processed.fetch_add(1, Ordering::AcqRel) + 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/progress.rs"]
mod tests;
