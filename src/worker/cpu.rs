//! CPU worker: the generate-and-test loop.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::matcher::{TargetKind, TargetSet};

use super::progress::ProgressCounter;
use super::reporter::{MatchRecord, MatchReporter};
use super::signal::CancellationSignal;
use super::source::{Candidate, CandidateSource};
use super::WorkerError;

/// The keypair that ended the search.
#[derive(Debug, Clone)]
pub struct Found {
    /// The ID of the worker that found it
    pub worker_id: usize,
    /// The primary target it satisfies
    pub target: String,
    /// The winning candidate
    pub candidate: Candidate,
    /// Encoded secret key, as reported
    pub nsec: String,
    /// Total attempts when it was found
    pub attempts: u64,
    /// Time since the search started
    pub elapsed: Duration,
}

/// How a worker's loop ended.
#[derive(Debug)]
pub enum WorkerExit {
    /// This worker claimed the primary match
    Found(Found),
    /// The cancellation signal was observed
    Stopped,
    /// Candidate generation or encoding failed
    Failed(WorkerError),
}

/// Shared state handed to every worker.
#[derive(Clone)]
pub struct WorkerContext {
    pub targets: Arc<TargetSet>,
    pub counter: Arc<ProgressCounter>,
    pub reporter: Arc<MatchReporter>,
    pub signal: Arc<CancellationSignal>,
    /// Attempts tallied locally before being added to the shared counter
    pub flush_every: u64,
}

/// A worker that generates and tests candidates.
pub struct SearchWorker<S> {
    /// Worker ID
    id: usize,
    /// Where candidates come from
    source: S,
    /// Shared state
    ctx: WorkerContext,
    /// Attempts not yet added to the shared counter
    tally: u64,
}

impl<S: CandidateSource> SearchWorker<S> {
    /// Creates a new worker.
    pub fn new(id: usize, source: S, ctx: WorkerContext) -> Self {
        Self {
            id,
            source,
            ctx,
            tally: 0,
        }
    }

    /// Runs the worker loop.
    ///
    /// Generates candidates and tests them against the targets until:
    /// - This worker claims a primary match
    /// - The cancellation signal is set
    /// - Candidate generation fails
    ///
    /// Unflushed attempts are added to the shared counter on every exit.
    pub fn run(mut self) -> WorkerExit {
        debug!("worker {} started", self.id);
        let flush_every = self.ctx.flush_every.max(1);

        let exit = loop {
            if self.ctx.signal.is_set() {
                break WorkerExit::Stopped;
            }

            let candidate = match self.source.next_candidate() {
                Ok(candidate) => candidate,
                Err(e) => break WorkerExit::Failed(e),
            };
            self.tally += 1;

            match self.check(candidate) {
                Ok(Some(found)) => break WorkerExit::Found(found),
                Ok(None) => {}
                Err(e) => break WorkerExit::Failed(e),
            }

            if self.tally >= flush_every {
                self.ctx.counter.increment(self.tally);
                self.tally = 0;
            }
        };

        if self.tally > 0 {
            self.ctx.counter.increment(self.tally);
        }
        debug!("worker {} exiting", self.id);
        exit
    }

    /// Tests one candidate: every bonus target, then primaries in order.
    fn check(&self, candidate: Candidate) -> Result<Option<Found>, WorkerError> {
        let targets = &self.ctx.targets;
        let identifier = candidate.identifier();

        for target in targets.bonus_hits(identifier) {
            let record = self.record(target, TargetKind::Bonus, &candidate)?;
            self.ctx.reporter.report(&record);
        }

        let Some(target) = targets.first_primary(identifier) else {
            return Ok(None);
        };

        // Encode before claiming so an encoding failure leaves the signal unset.
        let record = self.record(target, TargetKind::Primary, &candidate)?;
        if !self.ctx.signal.claim_match() {
            debug!(
                "worker {} matched '{}' after the search was stopped; discarding",
                self.id, target
            );
            return Ok(None);
        }
        self.ctx.reporter.report(&record);

        Ok(Some(Found {
            worker_id: self.id,
            target: target.to_string(),
            attempts: record.attempts,
            elapsed: record.elapsed,
            nsec: record.nsec,
            candidate,
        }))
    }

    fn record(
        &self,
        target: &str,
        kind: TargetKind,
        candidate: &Candidate,
    ) -> Result<MatchRecord, WorkerError> {
        let attempts = self.ctx.counter.current() + self.tally;
        Ok(MatchRecord::new(
            target,
            kind,
            candidate,
            attempts,
            self.ctx.counter.elapsed(),
        )?)
    }
}
