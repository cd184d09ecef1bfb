//! Integration tests for the DriveSeal crypto module.

use driveseal::crypto::digest::{digest, verify};
use driveseal::crypto::encryption::{NONCE_LEN, TAG_LEN};
use driveseal::crypto::kdf::SALT_LEN;
use driveseal::crypto::{derive, generate_nonce, generate_salt, open, seal};
use driveseal::errors::{DriveSealError, ErrorKind};

// Low cost keeps the suite fast; the reference count is covered in
// envelope_tests.rs.
const ITERATIONS: u32 = 2_000;

// ---------------------------------------------------------------------------
// seal / open round-trip
// ---------------------------------------------------------------------------

#[test]
fn seal_open_roundtrip_with_derived_key() {
    let salt = generate_salt().expect("salt");
    let nonce = generate_nonce().expect("nonce");
    let plaintext = b"quarterly-report.pdf contents";

    let key = derive(b"correct-horse", &salt, ITERATIONS).expect("derive");
    let ciphertext = seal(plaintext, key.as_bytes(), &nonce).expect("seal");
    drop(key);

    // Re-derive from scratch, as a later session would.
    let key = derive(b"correct-horse", &salt, ITERATIONS).expect("derive again");
    let recovered = open(&ciphertext, key.as_bytes(), &nonce).expect("open");
    assert_eq!(recovered, plaintext);
}

#[test]
fn ciphertext_carries_the_tag() {
    let key = [0xABu8; 32];
    let nonce = [0x01u8; NONCE_LEN];
    let plaintext = vec![0x5Au8; 1000];

    let ciphertext = seal(&plaintext, &key, &nonce).expect("seal");
    assert_eq!(ciphertext.len(), plaintext.len() + TAG_LEN);
    assert_ne!(&ciphertext[..plaintext.len()], plaintext.as_slice());
}

#[test]
fn open_with_key_from_wrong_password_fails() {
    let salt = generate_salt().expect("salt");
    let nonce = generate_nonce().expect("nonce");

    let key = derive(b"right", &salt, ITERATIONS).expect("derive");
    let ciphertext = seal(b"TOP_SECRET=42", key.as_bytes(), &nonce).expect("seal");

    let wrong = derive(b"wrong", &salt, ITERATIONS).expect("derive wrong");
    let err = open(&ciphertext, wrong.as_bytes(), &nonce).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
}

#[test]
fn every_single_byte_flip_is_detected() {
    let key = [0xBBu8; 32];
    let nonce = [0x02u8; NONCE_LEN];
    let ciphertext = seal(b"VALUE=abc", &key, &nonce).expect("seal");

    for i in 0..ciphertext.len() {
        let mut tampered = ciphertext.clone();
        tampered[i] ^= 0x01;
        let result = open(&tampered, &key, &nonce);
        assert!(
            matches!(result, Err(DriveSealError::AuthenticationFailure)),
            "flip at byte {i} must fail authentication"
        );
    }
}

#[test]
fn appended_or_truncated_ciphertext_fails() {
    let key = [0xCCu8; 32];
    let nonce = [0x03u8; NONCE_LEN];
    let ciphertext = seal(b"payload", &key, &nonce).expect("seal");

    let mut longer = ciphertext.clone();
    longer.push(0);
    assert!(open(&longer, &key, &nonce).is_err());
    assert!(open(&ciphertext[..ciphertext.len() - 1], &key, &nonce).is_err());
}

#[test]
fn bad_lengths_are_rejected_before_the_cipher_runs() {
    let key = [0u8; 32];
    let err = seal(b"x", &key, &[0u8; 16]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInputLength);

    let err = open(&[0u8; 32], &key, &[0u8; 8]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInputLength);

    let err = derive(b"pw", &[0u8; SALT_LEN - 1], 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInputLength);
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derive_same_inputs_same_output() {
    let salt = generate_salt().expect("salt");
    let k1 = derive(b"my-secure-passphrase", &salt, ITERATIONS).expect("derive 1");
    let k2 = derive(b"my-secure-passphrase", &salt, ITERATIONS).expect("derive 2");
    assert_eq!(k1.as_bytes(), k2.as_bytes());
}

#[test]
fn derive_different_passwords_different_keys() {
    let salt = generate_salt().expect("salt");
    let k1 = derive(b"password-one", &salt, ITERATIONS).expect("derive 1");
    let k2 = derive(b"password-two", &salt, ITERATIONS).expect("derive 2");
    assert_ne!(k1.as_bytes(), k2.as_bytes());
}

// ---------------------------------------------------------------------------
// Digest
// ---------------------------------------------------------------------------

#[test]
fn empty_digest_is_the_well_known_value() {
    let expected = "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=";
    for _ in 0..3 {
        assert_eq!(digest(b""), expected);
    }
    assert!(verify(b"", expected));
}

#[test]
fn digest_detects_post_download_corruption() {
    let downloaded = b"ciphertext bytes from storage".to_vec();
    let recorded = digest(&downloaded);

    let mut corrupted = downloaded.clone();
    corrupted[0] ^= 0x80;
    assert!(verify(&downloaded, &recorded));
    assert!(!verify(&corrupted, &recorded));
}
