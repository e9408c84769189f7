//! Candidate keys for the search loop.

use crate::crypto::{Keypair, NPUB_PREFIX};

use super::WorkerError;

/// A generated keypair with its encoded public key.
#[derive(Debug, Clone)]
pub struct Candidate {
    keypair: Keypair,
    npub: String,
}

impl Candidate {
    pub fn new(keypair: Keypair, npub: String) -> Self {
        Self { keypair, npub }
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    /// The full encoded public key, `npub1...`.
    pub fn npub(&self) -> &str {
        &self.npub
    }

    /// The part of the encoded key that targets are matched against.
    #[inline]
    pub fn identifier(&self) -> &str {
        self.npub.strip_prefix(NPUB_PREFIX).unwrap_or(&self.npub)
    }
}

/// Produces candidates for one worker.
pub trait CandidateSource {
    fn next_candidate(&mut self) -> Result<Candidate, WorkerError>;
}

/// Fresh random keypairs from the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCandidates;

impl RandomCandidates {
    pub fn new() -> Self {
        Self
    }
}

impl CandidateSource for RandomCandidates {
    #[inline]
    fn next_candidate(&mut self) -> Result<Candidate, WorkerError> {
        let keypair = Keypair::generate();
        let npub = keypair.npub()?;
        Ok(Candidate::new(keypair, npub))
    }
}
