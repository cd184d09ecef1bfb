//! Envelope module — ciphertext plus the public metadata needed to open it.
//!
//! This module provides:
//! - The JSON metadata bundle codec (`metadata`)
//! - The encrypt / decrypt paths (`seal`)
//! - Worker-thread wrappers for interactive callers (`worker`)

pub mod metadata;
pub mod seal;
pub mod worker;

// Re-export the most commonly used items.
pub use metadata::{decode, encode, select_metadata, Metadata, METADATA_HEADER};
pub use seal::{decrypt, decrypt_bound, encrypt, encrypt_bound, SealedFile};
pub use worker::{spawn_decrypt, spawn_encrypt, Pending};
