//! Content hashing for post-download integrity checks.
//!
//! Independent of the AEAD tag: a digest can be computed over either the
//! ciphertext (before decrypting) or the plaintext (after), and compared
//! against a value recorded elsewhere.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Length of a raw SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// SHA-256 of `data`, standard-base64 encoded.
pub fn digest(data: &[u8]) -> String {
    BASE64.encode(Sha256::digest(data))
}

/// SHA-256 of `data`, lowercase hex encoded.
pub fn digest_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check `data` against `expected`, given either as base64 or as hex.
///
/// Uses constant-time comparison over the raw digest bytes.  Anything
/// that does not decode to a 32-byte digest simply does not match.
pub fn verify(data: &[u8], expected: &str) -> bool {
    let Some(expected_bytes) = parse_digest(expected.trim()) else {
        return false;
    };
    let actual = Sha256::digest(data);
    actual.as_slice().ct_eq(&expected_bytes).into()
}

fn parse_digest(text: &str) -> Option<Vec<u8>> {
    if text.len() == DIGEST_LEN * 2 {
        if let Ok(bytes) = hex::decode(text) {
            return Some(bytes);
        }
    }
    BASE64
        .decode(text)
        .ok()
        .filter(|bytes| bytes.len() == DIGEST_LEN)
}
