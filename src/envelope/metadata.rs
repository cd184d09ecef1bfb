//! The metadata bundle that travels beside every ciphertext.
//!
//! Wire form is a flat JSON object:
//!
//! ```text
//! {"algorithm":"AES-256-GCM","salt":"<base64, 16 bytes>","iv":"<base64, 12 bytes>",
//!  "kdf":"PBKDF2-SHA256","iterations":100000}
//! ```
//!
//! - **algorithm**, **salt**, **iv**: required.  Binary fields use the
//!   standard base64 alphabet, each encoded independently.
//! - **kdf**, **iterations**, **memory_kib**, **parallelism**: optional.
//!   Bundles written before these existed carry only the three required
//!   keys and are read as PBKDF2-SHA256 at 100 000 iterations.
//! - Unknown keys are ignored.
//!
//! The ciphertext itself is never embedded here.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::encryption::{AES_256_GCM, NONCE_LEN};
use crate::crypto::kdf::{KdfParams, ARGON2ID, DEFAULT_PBKDF2_ITERATIONS, PBKDF2_SHA256, SALT_LEN};
use crate::errors::{DriveSealError, Result};

/// Name of the HTTP response header the storage server returns the
/// bundle in on download.
pub const METADATA_HEADER: &str = "X-File-Metadata";

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// A decoded, length-validated metadata bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    /// Cipher identifier (currently always `AES-256-GCM`).
    pub algorithm: String,

    /// KDF salt (base64 in JSON).
    #[serde(serialize_with = "base64_encode")]
    pub salt: [u8; SALT_LEN],

    /// AEAD nonce (base64 in JSON).
    #[serde(serialize_with = "base64_encode")]
    pub iv: [u8; NONCE_LEN],

    /// KDF name.  Absent in legacy bundles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kdf: Option<String>,

    /// KDF iteration count (PBKDF2 rounds or Argon2 passes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,

    /// Argon2 memory cost in KiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_kib: Option<u32>,

    /// Argon2 parallelism.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,
}

/// Loosely-typed view of the wire JSON, used only while decoding so each
/// failure can be classified precisely.
#[derive(Deserialize)]
struct RawMetadata {
    algorithm: Option<String>,
    salt: Option<String>,
    iv: Option<String>,
    kdf: Option<String>,
    iterations: Option<u32>,
    memory_kib: Option<u32>,
    parallelism: Option<u32>,
}

impl Metadata {
    /// Bundle with only the three required fields (legacy form).
    pub fn new(algorithm: &str, salt: [u8; SALT_LEN], iv: [u8; NONCE_LEN]) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            salt,
            iv,
            kdf: None,
            iterations: None,
            memory_kib: None,
            parallelism: None,
        }
    }

    /// Record the KDF parameters so decryption does not depend on the
    /// current default.
    pub fn with_kdf(mut self, params: &KdfParams) -> Self {
        self.kdf = Some(params.name().to_string());
        match *params {
            KdfParams::Pbkdf2Sha256 { iterations } => {
                self.iterations = Some(iterations);
                self.memory_kib = None;
                self.parallelism = None;
            }
            KdfParams::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                self.iterations = Some(iterations);
                self.memory_kib = Some(memory_kib);
                self.parallelism = Some(parallelism);
            }
        }
        self
    }

    /// Serialize to the JSON wire text.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| DriveSealError::MalformedMetadata(format!("serialize: {e}")))
    }

    /// Parse and validate the JSON wire text.
    pub fn decode(text: &str) -> Result<Self> {
        let raw: RawMetadata = serde_json::from_str(text)
            .map_err(|e| DriveSealError::MalformedMetadata(format!("not a metadata object: {e}")))?;

        let algorithm = required(raw.algorithm, "algorithm")?;
        let salt = decode_field(&required(raw.salt, "salt")?, "salt")?;
        let iv = decode_field(&required(raw.iv, "iv")?, "iv")?;

        Ok(Self {
            algorithm,
            salt: fixed_len(salt, "salt")?,
            iv: fixed_len(iv, "iv")?,
            kdf: raw.kdf,
            iterations: raw.iterations,
            memory_kib: raw.memory_kib,
            parallelism: raw.parallelism,
        })
    }

    /// Fail unless the bundle names a cipher this crate implements.
    pub fn ensure_supported_algorithm(&self) -> Result<()> {
        if self.algorithm.eq_ignore_ascii_case(AES_256_GCM) {
            Ok(())
        } else {
            Err(DriveSealError::UnsupportedAlgorithm(self.algorithm.clone()))
        }
    }

    /// Resolve the KDF parameters this bundle was sealed with.
    ///
    /// Costs outside the accepted range are refused here, before any key
    /// derivation is attempted.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        let params = self.declared_kdf()?;
        params.validate()?;
        Ok(params)
    }

    fn declared_kdf(&self) -> Result<KdfParams> {
        let kdf = self.kdf.as_deref().unwrap_or(PBKDF2_SHA256);

        if kdf.eq_ignore_ascii_case(PBKDF2_SHA256) {
            return Ok(KdfParams::Pbkdf2Sha256 {
                iterations: self.iterations.unwrap_or(DEFAULT_PBKDF2_ITERATIONS),
            });
        }

        if kdf.eq_ignore_ascii_case(ARGON2ID) {
            let (Some(memory_kib), Some(iterations), Some(parallelism)) =
                (self.memory_kib, self.iterations, self.parallelism)
            else {
                return Err(DriveSealError::MalformedMetadata(
                    "Argon2id bundle needs memory_kib, iterations and parallelism".into(),
                ));
            };
            return Ok(KdfParams::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            });
        }

        Err(DriveSealError::UnsupportedAlgorithm(kdf.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Free-function codec
// ---------------------------------------------------------------------------

/// Encode `(algorithm, salt, nonce)` as wire text.
///
/// Lengths are checked so a bundle that could never decrypt is never
/// produced.
pub fn encode(algorithm: &str, salt: &[u8], nonce: &[u8]) -> Result<String> {
    let salt: [u8; SALT_LEN] = salt
        .try_into()
        .map_err(|_| DriveSealError::InvalidInputLength {
            field: "salt",
            expected: SALT_LEN,
            actual: salt.len(),
        })?;
    let iv: [u8; NONCE_LEN] = nonce
        .try_into()
        .map_err(|_| DriveSealError::InvalidInputLength {
            field: "nonce",
            expected: NONCE_LEN,
            actual: nonce.len(),
        })?;
    Metadata::new(algorithm, salt, iv).encode()
}

/// Decode wire text into a validated [`Metadata`].
pub fn decode(text: &str) -> Result<Metadata> {
    Metadata::decode(text)
}

/// Pick the authoritative metadata text for a download.
///
/// The [`METADATA_HEADER`] response header wins; the copy stored with the
/// file record is the fallback.  Blank values count as absent.
pub fn select_metadata<'a>(header: Option<&'a str>, stored: Option<&'a str>) -> Result<&'a str> {
    header
        .filter(|s| !s.trim().is_empty())
        .or_else(|| stored.filter(|s| !s.trim().is_empty()))
        .ok_or_else(|| DriveSealError::MalformedMetadata("no metadata available".into()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn required(value: Option<String>, field: &str) -> Result<String> {
    value.ok_or_else(|| DriveSealError::MalformedMetadata(format!("missing '{field}' field")))
}

fn decode_field(text: &str, field: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(text)
        .map_err(|e| DriveSealError::MalformedMetadata(format!("'{field}' is not base64: {e}")))
}

fn fixed_len<const N: usize>(bytes: Vec<u8>, field: &'static str) -> Result<[u8; N]> {
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| DriveSealError::ValidationFailure {
            field,
            expected: N,
            actual,
        })
}

fn base64_encode<S, T>(data: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: AsRef<[u8]>,
{
    serializer.serialize_str(&BASE64.encode(data.as_ref()))
}
