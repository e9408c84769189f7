//! Shared stop latch.

use std::sync::atomic::{AtomicU8, Ordering};

const RUNNING: u8 = 0;
const MATCHED: u8 = 1;
const INTERRUPTED: u8 = 2;

/// Single-shot stop flag observed by every worker at the top of its loop.
///
/// Leaves the running state at most once, either because a worker claimed
/// a primary match or because the operator interrupted the search. Never
/// resets.
#[derive(Debug, Default)]
pub struct CancellationSignal {
    state: AtomicU8,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the search should stop, for any reason.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.state.load(Ordering::Acquire) != RUNNING
    }

    /// Claims the search result. Exactly one caller ever gets `true`.
    pub fn claim_match(&self) -> bool {
        self.transition(MATCHED)
    }

    /// Stops the search without a result. Returns false if already stopped.
    pub fn interrupt(&self) -> bool {
        self.transition(INTERRUPTED)
    }

    pub fn is_matched(&self) -> bool {
        self.state.load(Ordering::Acquire) == MATCHED
    }

    pub fn is_interrupted(&self) -> bool {
        self.state.load(Ordering::Acquire) == INTERRUPTED
    }

    fn transition(&self, to: u8) -> bool {
        self.state
            .compare_exchange(RUNNING, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
