//! The encrypt and decrypt paths callers actually use.
//!
//! Every call derives its own key from the password and the bundle's
//! salt, uses it for exactly one AEAD operation, and drops it (the
//! `DerivedKey` zeroizes itself).  Nothing is cached between calls.

use zeroize::Zeroizing;

use crate::crypto::encryption::{self, generate_nonce, AES_256_GCM};
use crate::crypto::kdf::{derive_key, generate_salt, KdfParams};
use crate::errors::Result;

use super::metadata::Metadata;

/// Output of the encrypt path.
///
/// The two halves are stored side by side; the metadata text is never
/// embedded inside the ciphertext.
#[derive(Debug, Clone)]
pub struct SealedFile {
    /// `ciphertext || 16-byte tag`.
    pub ciphertext: Vec<u8>,
    /// JSON metadata bundle (see [`Metadata`]).
    pub metadata_text: String,
}

/// Encrypt `plaintext` under `password` with a fresh salt and nonce.
pub fn encrypt(plaintext: &[u8], password: &[u8], params: &KdfParams) -> Result<SealedFile> {
    encrypt_inner(plaintext, password, params, &[])
}

/// Like [`encrypt`], but binds `file_id` into the tag as associated data.
///
/// The same `file_id` must be supplied to [`decrypt_bound`]; the id is
/// not recorded in the bundle.
pub fn encrypt_bound(
    plaintext: &[u8],
    password: &[u8],
    params: &KdfParams,
    file_id: &[u8],
) -> Result<SealedFile> {
    encrypt_inner(plaintext, password, params, file_id)
}

/// Decrypt `ciphertext` using the bundle in `metadata_text`.
///
/// Wrong password, wrong bundle and tampered ciphertext all produce the
/// same `AuthenticationFailure`.
pub fn decrypt(ciphertext: &[u8], metadata_text: &str, password: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    decrypt_inner(ciphertext, metadata_text, password, &[])
}

/// Decrypt a ciphertext produced by [`encrypt_bound`].
pub fn decrypt_bound(
    ciphertext: &[u8],
    metadata_text: &str,
    password: &[u8],
    file_id: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    decrypt_inner(ciphertext, metadata_text, password, file_id)
}

fn encrypt_inner(
    plaintext: &[u8],
    password: &[u8],
    params: &KdfParams,
    aad: &[u8],
) -> Result<SealedFile> {
    params.validate()?;

    // Both drawn fresh, independently, for every call.
    let salt = generate_salt()?;
    let nonce = generate_nonce()?;

    tracing::debug!(
        bytes = plaintext.len(),
        kdf = params.name(),
        iterations = params.iterations(),
        bound = !aad.is_empty(),
        "sealing"
    );

    let ciphertext = {
        let key = derive_key(password, &salt, params)?;
        encryption::seal_with_aad(plaintext, key.as_bytes(), &nonce, aad)?
    };

    let metadata_text = Metadata::new(AES_256_GCM, salt, nonce)
        .with_kdf(params)
        .encode()?;

    Ok(SealedFile {
        ciphertext,
        metadata_text,
    })
}

fn decrypt_inner(
    ciphertext: &[u8],
    metadata_text: &str,
    password: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let metadata = Metadata::decode(metadata_text)?;
    metadata.ensure_supported_algorithm()?;
    let params = metadata.kdf_params()?;

    tracing::debug!(
        bytes = ciphertext.len(),
        kdf = params.name(),
        iterations = params.iterations(),
        bound = !aad.is_empty(),
        "opening"
    );

    let key = derive_key(password, &metadata.salt, &params)?;
    let plaintext = encryption::open_with_aad(ciphertext, key.as_bytes(), &metadata.iv, aad)
        .inspect_err(|e| tracing::debug!(error = %e, "open failed"))?;

    Ok(Zeroizing::new(plaintext))
}
