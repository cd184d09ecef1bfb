//! AES-256-GCM authenticated encryption.
//!
//! Unlike a self-contained blob format, the nonce is *not* prepended
//! here: it travels in the metadata bundle next to the ciphertext.
//!
//! Layout of the returned byte buffer:
//!   [ ciphertext | 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};

use super::keys::KEY_LEN;
use super::random::random_array;
use crate::errors::{DriveSealError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Algorithm identifier carried in the metadata bundle.
pub const AES_256_GCM: &str = "AES-256-GCM";

/// Encrypt `plaintext` under `key` and `nonce` with no associated data.
pub fn seal(plaintext: &[u8], key: &[u8], nonce: &[u8]) -> Result<Vec<u8>> {
    seal_with_aad(plaintext, key, nonce, &[])
}

/// Decrypt and verify `ciphertext` under `key` and `nonce`.
///
/// Returns `AuthenticationFailure` if the tag does not verify; no bytes
/// are returned in that case.
pub fn open(ciphertext: &[u8], key: &[u8], nonce: &[u8]) -> Result<Vec<u8>> {
    open_with_aad(ciphertext, key, nonce, &[])
}

/// Encrypt `plaintext`, binding `aad` into the authentication tag.
pub fn seal_with_aad(plaintext: &[u8], key: &[u8], nonce: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = build_cipher(key, nonce)?;

    cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| DriveSealError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Decrypt `ciphertext` that was sealed with the same `aad`.
pub fn open_with_aad(ciphertext: &[u8], key: &[u8], nonce: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = build_cipher(key, nonce)?;

    // Too short to even hold the tag.
    if ciphertext.len() < TAG_LEN {
        return Err(DriveSealError::AuthenticationFailure);
    }

    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| DriveSealError::AuthenticationFailure)
}

/// Generate a fresh 12-byte nonce from the OS CSPRNG.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    random_array()
}

/// Check key and nonce lengths, then build the cipher.
fn build_cipher(key: &[u8], nonce: &[u8]) -> Result<Aes256Gcm> {
    if key.len() != KEY_LEN {
        return Err(DriveSealError::InvalidInputLength {
            field: "key",
            expected: KEY_LEN,
            actual: key.len(),
        });
    }
    if nonce.len() != NONCE_LEN {
        return Err(DriveSealError::InvalidInputLength {
            field: "nonce",
            expected: NONCE_LEN,
            actual: nonce.len(),
        });
    }

    Aes256Gcm::new_from_slice(key).map_err(|_| DriveSealError::InvalidInputLength {
        field: "key",
        expected: KEY_LEN,
        actual: key.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x11; KEY_LEN];
    const NONCE: [u8; NONCE_LEN] = [0x22; NONCE_LEN];

    #[test]
    fn ciphertext_is_plaintext_plus_tag() {
        let ct = seal(b"hello", &KEY, &NONCE).unwrap();
        assert_eq!(ct.len(), 5 + TAG_LEN);
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let ct = seal(b"", &KEY, &NONCE).unwrap();
        assert_eq!(ct.len(), TAG_LEN);
        assert!(open(&ct, &KEY, &NONCE).unwrap().is_empty());
    }

    #[test]
    fn rejects_wrong_nonce_length_before_cipher() {
        for len in [0usize, 8, 11, 13, 16] {
            let nonce = vec![0u8; len];
            let err = seal(b"x", &KEY, &nonce).unwrap_err();
            assert!(matches!(
                err,
                DriveSealError::InvalidInputLength { field: "nonce", .. }
            ));
        }
    }

    #[test]
    fn rejects_wrong_key_length() {
        let err = seal(b"x", &[0u8; 16], &NONCE).unwrap_err();
        assert!(matches!(
            err,
            DriveSealError::InvalidInputLength {
                field: "key",
                expected: 32,
                actual: 16
            }
        ));
    }

    #[test]
    fn wrong_nonce_fails_authentication() {
        let ct = seal(b"payload", &KEY, &NONCE).unwrap();
        let err = open(&ct, &KEY, &[0x23; NONCE_LEN]).unwrap_err();
        assert!(matches!(err, DriveSealError::AuthenticationFailure));
    }

    #[test]
    fn truncated_ciphertext_fails_authentication() {
        let err = open(&[0u8; 5], &KEY, &NONCE).unwrap_err();
        assert!(matches!(err, DriveSealError::AuthenticationFailure));
    }

    #[test]
    fn aad_mismatch_fails_authentication() {
        let ct = seal_with_aad(b"payload", &KEY, &NONCE, b"file-1").unwrap();
        assert!(open_with_aad(&ct, &KEY, &NONCE, b"file-2").is_err());
        assert!(open(&ct, &KEY, &NONCE).is_err());
        assert_eq!(
            open_with_aad(&ct, &KEY, &NONCE, b"file-1").unwrap(),
            b"payload"
        );
    }
}
