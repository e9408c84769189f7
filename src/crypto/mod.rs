//! Key generation and NIP-19 encoding for nostr identities.
//!
//! This module provides:
//! - Secure random secp256k1 key generation
//! - x-only (BIP-340) public key derivation
//! - Bech32 `npub` / `nsec` encoding

mod keypair;
pub mod nip19;

pub use keypair::Keypair;
pub use nip19::{encode_npub, encode_nsec, ALPHABET, NPUB_PREFIX};

/// Failures of the key and encoding primitives.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(#[from] secp256k1::Error),
    #[error("bech32 encoding failed: {0}")]
    Encoding(#[from] bech32::Error),
}
