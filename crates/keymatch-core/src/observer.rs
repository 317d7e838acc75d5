//! Progress and cancellation hook for long match runs.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::Tier;

/// Receives progress events from the engine and may request cancellation.
///
/// Called from rayon worker threads during the fuzzy tier, hence `Sync`.
pub trait MatchObserver: Sync {
    /// A tier is about to evaluate `pending` rows.
    fn tier_started(&self, _tier: Tier, _pending: usize) {}

    /// One row has been evaluated by `tier`, matched or not.
    fn row_evaluated(&self, _tier: Tier) {}

    /// Polled before each tier and before each fuzzy row.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}

/// Observer whose only behavior is a cancel switch shared across threads.
#[derive(Debug, Default)]
pub struct CancelFlag {
    cancelled: AtomicBool,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl MatchObserver for CancelFlag {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
