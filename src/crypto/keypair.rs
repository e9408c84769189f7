//! Nostr keypair generation.

use std::fmt;

use secp256k1::{PublicKey, SecretKey, SECP256K1};

use super::{nip19, CryptoError};

/// A secp256k1 secret key with its x-only public key.
#[derive(Clone)]
pub struct Keypair {
    /// The secret key bytes (32 bytes)
    secret_key: [u8; 32],
    /// The x-only public key (BIP-340), which is the nostr identity
    public_key: [u8; 32],
}

impl Keypair {
    /// Generates a new random keypair.
    ///
    /// Uses a cryptographically secure random number generator.
    #[inline]
    pub fn generate() -> Self {
        let (secret_key, public_key) = SECP256K1.generate_keypair(&mut rand::thread_rng());
        Self::from_parts(&secret_key, &public_key)
    }

    /// Builds a keypair from an existing secret key.
    pub fn from_secret_key(secret_bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let secret_key = SecretKey::from_slice(&secret_bytes)?;
        let public_key = PublicKey::from_secret_key(SECP256K1, &secret_key);
        Ok(Self::from_parts(&secret_key, &public_key))
    }

    #[inline]
    fn from_parts(secret_key: &SecretKey, public_key: &PublicKey) -> Self {
        let (x_only, _parity) = public_key.x_only_public_key();
        Self {
            secret_key: secret_key.secret_bytes(),
            public_key: x_only.serialize(),
        }
    }

    /// Returns the bech32 encoded public key (`npub1...`).
    #[inline]
    pub fn npub(&self) -> Result<String, CryptoError> {
        nip19::encode_npub(&self.public_key)
    }

    /// Returns the bech32 encoded secret key (`nsec1...`).
    pub fn nsec(&self) -> Result<String, CryptoError> {
        nip19::encode_nsec(&self.secret_key)
    }

    /// Returns the x-only public key as hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }

    /// Returns the secret key as hex.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", self.public_key_hex())
    }
}
