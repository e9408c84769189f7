//! Bech32 entity encoding (NIP-19).

use bech32::{ToBase32, Variant};

use super::CryptoError;

/// Characters a bech32 data part can contain.
pub const ALPHABET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Human-readable part of an encoded public key.
pub const NPUB_HRP: &str = "npub";

/// Human-readable part of an encoded secret key.
pub const NSEC_HRP: &str = "nsec";

/// Every encoded public key starts with this; it carries no entropy.
pub const NPUB_PREFIX: &str = "npub1";

/// Encodes a 32-byte x-only public key as `npub1...`.
pub fn encode_npub(public_key: &[u8; 32]) -> Result<String, CryptoError> {
    encode(NPUB_HRP, public_key)
}

/// Encodes a 32-byte secret key as `nsec1...`.
pub fn encode_nsec(secret_key: &[u8; 32]) -> Result<String, CryptoError> {
    encode(NSEC_HRP, secret_key)
}

fn encode(hrp: &str, bytes: &[u8]) -> Result<String, CryptoError> {
    Ok(bech32::encode(hrp, bytes.to_base32(), Variant::Bech32)?)
}

/// Returns true if `c` can appear in the data part of an encoding.
#[inline]
pub fn is_alphabet_char(c: char) -> bool {
    ALPHABET.contains(c)
}

/// The alphabet in sorted order, for operator-facing messages.
pub fn sorted_alphabet() -> String {
    let mut chars: Vec<char> = ALPHABET.chars().collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}
