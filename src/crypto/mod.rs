//! Cryptographic primitives for DriveSeal.
//!
//! This module provides:
//! - OS-backed random bytes for salts and nonces (`random`)
//! - PBKDF2 / Argon2id password-based key derivation (`kdf`)
//! - The zeroize-on-drop `DerivedKey` holder (`keys`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - SHA-256 content digests (`digest`)

pub mod digest;
pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod random;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive, ...};
pub use encryption::{generate_nonce, open, open_with_aad, seal, seal_with_aad};
pub use kdf::{derive, derive_key, generate_salt, KdfParams};
pub use keys::DerivedKey;
