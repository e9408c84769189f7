//! Parallel search for matching keys.
//!
//! This module provides:
//! - Multi-threaded CPU workers
//! - A shared attempt counter and a single-shot cancellation signal
//! - Match reporting to the console and an optional log file
//! - The coordinator that runs a search to its outcome

mod cpu;
mod pool;
mod progress;
mod reporter;
mod signal;
mod source;

pub use cpu::{Found, SearchWorker, WorkerContext, WorkerExit};
pub use pool::{Coordinator, SearchError, SearchOutcome, SearchSettings};
pub use progress::ProgressCounter;
pub use reporter::{format_count, MatchRecord, MatchReporter};
pub use signal::CancellationSignal;
pub use source::{Candidate, CandidateSource, RandomCandidates};

use crate::crypto::CryptoError;

/// Failures that end a single worker's loop.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error("candidate source failed: {0}")]
    Source(String),
}
