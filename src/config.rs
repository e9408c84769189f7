//! Runtime configuration for the vanity npub miner.

use std::path::PathBuf;

use clap::Parser;

use crate::crypto::nip19::{is_alphabet_char, sorted_alphabet};
use crate::matcher::TargetSet;
use crate::worker::SearchSettings;

/// Nostr vanity npub miner
///
/// Search for `target` in an npub such that: npub1[target]acd023...
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The string(s) you're looking for (comma-separated, no spaces)
    #[arg(required = true, value_delimiter = ',')]
    pub targets: Vec<String>,

    /// Additional targets to search for, but does not end execution when found (comma-separated, no spaces)
    #[arg(short = 'b', long, value_delimiter = ',')]
    pub bonus_targets: Vec<String>,

    /// Also search the end of the npub
    #[arg(short = 'e', long, default_value = "false")]
    pub include_end: bool,

    /// Number of worker threads (0 = one per CPU core)
    #[arg(short = 'j', long, default_value = "2")]
    pub jobs: usize,

    /// Path to output file; every match is appended to it
    #[arg(short = 'o', long)]
    pub output_file: Option<PathBuf>,

    /// Log progress every N attempts (0 disables)
    #[arg(long, default_value = "1000000")]
    pub report_every: u64,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count for 0
    pub fn worker_count(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }

    /// Returns the engine settings for this configuration
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            jobs: self.worker_count(),
            report_every: self.report_every,
            ..SearchSettings::default()
        }
    }

    /// Lowercases and validates every target, then builds the target set.
    ///
    /// Every character must belong to the bech32 alphabet.
    pub fn target_set(&self) -> Result<TargetSet, ConfigError> {
        let primary = normalize(&self.targets)?;
        // `-b ""` means no bonus targets
        let bonus: Vec<String> = self
            .bonus_targets
            .iter()
            .filter(|target| !target.is_empty())
            .cloned()
            .collect();
        let bonus = normalize(&bonus)?;
        Ok(TargetSet::new(primary, bonus, self.include_end))
    }
}

fn normalize(targets: &[String]) -> Result<Vec<String>, ConfigError> {
    targets
        .iter()
        .map(|target| {
            let target = target.to_lowercase();
            if target.is_empty() {
                return Err(ConfigError::EmptyTarget);
            }
            if let Some(character) = target.chars().find(|&c| !is_alphabet_char(c)) {
                return Err(ConfigError::InvalidCharacter {
                    character,
                    alphabet: sorted_alphabet(),
                });
            }
            Ok(target)
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("\"{character}\" is not a valid character (not in the bech32 charset)\n\tbech32 chars: {alphabet}")]
    InvalidCharacter { character: char, alphabet: String },
    #[error("targets cannot be empty")]
    EmptyTarget,
}
