//! Match output: console and optional append-only log file.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use log::{debug, warn};

use crate::crypto::CryptoError;
use crate::matcher::TargetKind;

use super::source::Candidate;

/// A fully formatted match, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// The target that matched
    pub target: String,
    /// Primary or bonus
    pub kind: TargetKind,
    /// Total attempts when the match was found
    pub attempts: u64,
    /// Time since the search started
    pub elapsed: Duration,
    /// Encoded public key
    pub npub: String,
    /// Encoded secret key
    pub nsec: String,
}

impl MatchRecord {
    /// Builds the record for a matching candidate. Encodes the secret key.
    pub fn new(
        target: &str,
        kind: TargetKind,
        candidate: &Candidate,
        attempts: u64,
        elapsed: Duration,
    ) -> Result<Self, CryptoError> {
        Ok(Self {
            target: target.to_string(),
            kind,
            attempts,
            elapsed,
            npub: candidate.npub().to_string(),
            nsec: candidate.keypair().nsec()?,
        })
    }
}

impl fmt::Display for MatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {:.1}s\n{}\n{}\n",
            self.target,
            format_count(self.attempts),
            self.elapsed.as_secs_f64(),
            self.npub,
            self.nsec
        )
    }
}

/// Writes match records. Shared by all workers.
///
/// Each record is written whole under a lock, so records from different
/// workers never interleave. Write failures are logged and the record is
/// dropped for that destination; they never stop a worker.
pub struct MatchReporter {
    console: Mutex<Box<dyn Write + Send>>,
    output_file: Option<Mutex<File>>,
    reported: AtomicU64,
}

impl MatchReporter {
    /// Creates a reporter writing to stdout and, if given, appending to
    /// `output_path`.
    pub fn new(output_path: Option<&Path>) -> io::Result<Self> {
        Self::with_console(Box::new(io::stdout()), output_path)
    }

    /// Creates a reporter writing to a custom console sink.
    pub fn with_console(
        console: Box<dyn Write + Send>,
        output_path: Option<&Path>,
    ) -> io::Result<Self> {
        let output_file = match output_path {
            Some(path) => Some(Mutex::new(
                OpenOptions::new().create(true).append(true).open(path)?,
            )),
            None => None,
        };

        Ok(Self {
            console: Mutex::new(console),
            output_file,
            reported: AtomicU64::new(0),
        })
    }

    /// Writes one record to every destination.
    pub fn report(&self, record: &MatchRecord) {
        let text = record.to_string();
        self.reported.fetch_add(1, Ordering::Relaxed);
        debug!("reporting {} match for '{}'", record.kind, record.target);

        {
            let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = writeln!(console, "{}", text).and_then(|_| console.flush()) {
                warn!("Failed to write match for '{}' to console: {}", record.target, e);
            }
        }

        if let Some(ref file) = self.output_file {
            let mut file = file.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = file.write_all(text.as_bytes()).and_then(|_| file.flush()) {
                warn!("Failed to append match for '{}' to output file: {}", record.target, e);
            }
        }
    }

    /// Returns the number of records reported so far.
    pub fn total_reported(&self) -> u64 {
        self.reported.load(Ordering::Relaxed)
    }
}

/// Formats a count with thousands separators: `1234567` -> `1,234,567`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
