//! Cryptographic digest utilities.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares two secrets by their SHA-256 digests.
///
/// Comparing digests rather than the raw strings keeps the comparison
/// length-independent of the provided value.
pub fn digests_match(provided: &str, expected: &str) -> bool {
    sha256_hex(provided) == sha256_hex(expected)
}
