//! Search coordination.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::unbounded;
use log::{debug, error, info};

use crate::matcher::TargetSet;

use super::cpu::{Found, SearchWorker, WorkerContext, WorkerExit};
use super::progress::ProgressCounter;
use super::reporter::MatchReporter;
use super::signal::CancellationSignal;
use super::source::{CandidateSource, RandomCandidates};

/// Attempts a worker tallies locally before touching the shared counter.
pub const DEFAULT_FLUSH_EVERY: u64 = 10_000;

/// Attempts between progress log lines.
pub const DEFAULT_REPORT_EVERY: u64 = 1_000_000;

/// Engine settings for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    /// Number of worker threads
    pub jobs: usize,
    /// Local tally size before flushing to the shared counter
    pub flush_every: u64,
    /// Progress line interval, in attempts (0 disables)
    pub report_every: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            jobs: 2,
            flush_every: DEFAULT_FLUSH_EVERY,
            report_every: DEFAULT_REPORT_EVERY,
        }
    }
}

/// Terminal result of a search.
#[derive(Debug)]
pub enum SearchOutcome {
    /// A worker found a primary target
    Found(Found),
    /// The search was interrupted before any primary match
    Interrupted,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("no worker threads configured")]
    NoWorkers,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("all {count} workers stopped without a match (last error: {last})")]
    WorkersFailed { count: usize, last: String },
}

/// Runs a search across a pool of worker threads.
///
/// Owns the shared state: targets, attempt counter, reporter and the
/// cancellation signal. The search ends with the first worker that claims a
/// primary match, whichever worker that is.
pub struct Coordinator {
    /// Engine settings
    settings: SearchSettings,
    /// State shared with every worker
    ctx: WorkerContext,
}

impl Coordinator {
    /// Creates a coordinator. The elapsed-time clock starts here.
    pub fn new(settings: SearchSettings, targets: TargetSet, reporter: MatchReporter) -> Self {
        let ctx = WorkerContext {
            targets: Arc::new(targets),
            counter: Arc::new(ProgressCounter::new(settings.report_every)),
            reporter: Arc::new(reporter),
            signal: Arc::new(CancellationSignal::new()),
            flush_every: settings.flush_every,
        };
        Self { settings, ctx }
    }

    /// Runs the search with random keypairs.
    pub fn run(&self) -> Result<SearchOutcome, SearchError> {
        self.run_with(|_| RandomCandidates::new())
    }

    /// Runs the search with one candidate source per worker.
    ///
    /// Blocks until a worker claims a primary match, the search is
    /// interrupted, or every worker has failed. All workers are joined
    /// before returning.
    pub fn run_with<S, F>(&self, mut make_source: F) -> Result<SearchOutcome, SearchError>
    where
        S: CandidateSource + Send + 'static,
        F: FnMut(usize) -> S,
    {
        let jobs = self.settings.jobs;
        if jobs == 0 {
            return Err(SearchError::NoWorkers);
        }

        let (exit_tx, exit_rx) = unbounded::<(usize, WorkerExit)>();
        let mut handles = Vec::with_capacity(jobs);

        for id in 0..jobs {
            let worker = SearchWorker::new(id, make_source(id), self.ctx.clone());
            let exit_tx = exit_tx.clone();

            let spawned = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || {
                    let exit = worker.run();
                    // The coordinator may have stopped listening
                    let _ = exit_tx.send((id, exit));
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    self.ctx.signal.interrupt();
                    join_all(handles);
                    return Err(SearchError::Spawn(e));
                }
            }
        }

        // Drop our sender so the channel closes when every worker is done
        drop(exit_tx);
        info!("Initialized {} worker threads", jobs);

        let mut found = None;
        let mut failures = 0;
        let mut last_error = None;

        for (id, exit) in exit_rx.iter() {
            match exit {
                WorkerExit::Found(hit) => {
                    info!("Worker {} found target '{}'", id, hit.target);
                    found = Some(hit);
                    break;
                }
                WorkerExit::Stopped => debug!("worker {} stopped", id),
                WorkerExit::Failed(e) => {
                    error!("Worker {} aborted: {}", id, e);
                    failures += 1;
                    last_error = Some(e.to_string());
                }
            }
        }

        // The signal is set, so the remaining workers stop within one iteration
        join_all(handles);
        for (id, exit) in exit_rx.try_iter() {
            if let WorkerExit::Failed(e) = exit {
                error!("Worker {} aborted: {}", id, e);
            }
        }

        match found {
            Some(hit) => Ok(SearchOutcome::Found(hit)),
            None if self.ctx.signal.is_interrupted() => Ok(SearchOutcome::Interrupted),
            None => {
                if self.ctx.signal.is_matched() {
                    error!("A worker claimed a match but exited without returning it");
                }
                Err(SearchError::WorkersFailed {
                    count: failures,
                    last: last_error.unwrap_or_else(|| "worker panicked".into()),
                })
            }
        }
    }

    /// Returns the shared attempt counter.
    pub fn counter(&self) -> &ProgressCounter {
        &self.ctx.counter
    }

    /// Returns the match reporter.
    pub fn reporter(&self) -> &MatchReporter {
        &self.ctx.reporter
    }

    /// Returns a clone of the cancellation signal for external use (e.g., signal handlers).
    pub fn signal(&self) -> Arc<CancellationSignal> {
        self.ctx.signal.clone()
    }
}

fn join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if handle.join().is_err() {
            error!("Worker thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::source::scripted::ScriptedCandidates;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn coordinator(
        jobs: usize,
        primary: &[&str],
        bonus: &[&str],
        include_end: bool,
    ) -> (Coordinator, SharedBuffer) {
        let console = SharedBuffer::default();
        let reporter = MatchReporter::with_console(Box::new(console.clone()), None).unwrap();
        let targets = TargetSet::new(
            primary.iter().map(|s| s.to_string()).collect(),
            bonus.iter().map(|s| s.to_string()).collect(),
            include_end,
        );
        let settings = SearchSettings {
            jobs,
            flush_every: 7,
            report_every: 0,
        };
        (Coordinator::new(settings, targets, reporter), console)
    }

    fn count_reports(console: &str, target: &str) -> usize {
        let header = format!("{} | ", target);
        console.lines().filter(|l| l.starts_with(&header)).count()
    }

    #[test]
    fn test_first_match_reported_once_for_any_worker_count() {
        for jobs in [1, 2, 8] {
            let (coordinator, console) = coordinator(jobs, &["a"], &[], false);
            let script = ScriptedCandidates::new(&["zzzz", "azzz", "czzz"]);

            let outcome = coordinator.run_with(|_| script.clone()).unwrap();

            let SearchOutcome::Found(found) = outcome else {
                panic!("expected a match with {} workers", jobs);
            };
            assert_eq!(found.target, "a");
            assert_eq!(found.candidate.identifier(), "azzz");
            assert!(coordinator.signal().is_matched());
            assert_eq!(count_reports(&console.contents(), "a"), 1);
            assert_eq!(coordinator.reporter().total_reported(), 1);
            if jobs == 1 {
                assert_eq!(found.attempts, 2);
                assert!(console.contents().starts_with("a | 2 | "));
            }
        }
    }

    #[test]
    fn test_many_matching_candidates_single_winner() {
        let (coordinator, console) = coordinator(8, &["a"], &[], false);
        let script = ScriptedCandidates::new(&["azzz"; 64]);

        let outcome = coordinator.run_with(|_| script.clone()).unwrap();

        assert!(matches!(outcome, SearchOutcome::Found(_)));
        assert_eq!(count_reports(&console.contents(), "a"), 1);
    }

    #[test]
    fn test_bonus_then_primary() {
        let (coordinator, console) = coordinator(1, &["ab"], &["c"], true);
        let script = ScriptedCandidates::new(&["xxxc", "abcd"]);

        let outcome = coordinator.run_with(|_| script.clone()).unwrap();

        let SearchOutcome::Found(found) = outcome else {
            panic!("expected a match");
        };
        assert_eq!(found.target, "ab");
        let out = console.contents();
        assert!(out.starts_with("c | 1 | "));
        assert_eq!(count_reports(&out, "c"), 1);
        assert_eq!(count_reports(&out, "ab"), 1);
        assert!(out.contains("ab | 2 | "));
    }

    #[test]
    fn test_bonus_only_never_terminates_on_match() {
        let (coordinator, console) = coordinator(2, &[], &["q"], false);
        let script = ScriptedCandidates::new(&["qzzz"; 10]);

        let err = coordinator.run_with(|_| script.clone()).unwrap_err();

        assert!(matches!(err, SearchError::WorkersFailed { count: 2, .. }));
        assert!(!coordinator.signal().is_set());
        assert_eq!(count_reports(&console.contents(), "q"), 10);
        assert_eq!(coordinator.counter().current(), 10);
    }

    #[test]
    fn test_failed_worker_does_not_stop_others() {
        let (coordinator, console) = coordinator(2, &["a"], &[], false);
        let mut script = vec!["zzzz"; 500];
        script.push("azzz");
        let failing = ScriptedCandidates::new(&[]);
        let searching = ScriptedCandidates::new(&script);

        let outcome = coordinator
            .run_with(|id| if id == 0 { failing.clone() } else { searching.clone() })
            .unwrap();

        let SearchOutcome::Found(found) = outcome else {
            panic!("expected worker 1 to find a match");
        };
        assert_eq!(found.worker_id, 1);
        assert_eq!(found.candidate.identifier(), "azzz");
        assert!(coordinator.signal().is_matched());
        assert_eq!(count_reports(&console.contents(), "a"), 1);
        assert_eq!(coordinator.counter().current(), 501);
    }

    #[test]
    fn test_counter_matches_attempts() {
        let (coordinator, _console) = coordinator(4, &["a"], &[], false);
        let script = ScriptedCandidates::new(&["zzzz"; 1000]);

        let result = coordinator.run_with(|_| script.clone());

        assert!(result.is_err());
        assert_eq!(coordinator.counter().current(), 1000);
    }

    #[test]
    fn test_interrupted_before_match() {
        let (coordinator, console) = coordinator(2, &["a"], &[], false);
        coordinator.signal().interrupt();
        let script = ScriptedCandidates::new(&["azzz"]);

        let outcome = coordinator.run_with(|_| script.clone()).unwrap();

        assert!(matches!(outcome, SearchOutcome::Interrupted));
        assert!(console.contents().is_empty());
    }

    #[test]
    fn test_random_search_finds_short_target() {
        let (coordinator, _console) = coordinator(2, &["q"], &[], true);

        let outcome = coordinator.run().unwrap();

        let SearchOutcome::Found(found) = outcome else {
            panic!("expected a match");
        };
        let npub = found.candidate.keypair().npub().unwrap();
        assert_eq!(npub, found.candidate.npub());
        let identifier = found.candidate.identifier();
        assert!(identifier.starts_with('q') || identifier.ends_with('q'));
    }

    #[test]
    fn test_no_workers() {
        let (coordinator, _console) = coordinator(0, &["a"], &[], false);
        assert!(matches!(coordinator.run(), Err(SearchError::NoWorkers)));
    }
}
