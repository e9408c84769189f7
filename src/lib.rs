//! # nostr_vanity
//!
//! Multi-threaded nostr vanity npub miner.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation and NIP-19 bech32 encoding
//! - `matcher`: Primary and bonus targets, prefix/suffix matching
//! - `worker`: Search workers, shared progress, reporting and coordination
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod matcher;
pub mod worker;

pub use config::{Config, ConfigError};
pub use crypto::{CryptoError, Keypair};
pub use matcher::{TargetKind, TargetSet};
pub use worker::{
    CancellationSignal, Coordinator, Found, MatchRecord, MatchReporter, SearchError,
    SearchOutcome, SearchSettings,
};
