//! Password-based key derivation.
//!
//! The reference KDF is PBKDF2-HMAC-SHA256 with 100 000 iterations.
//! Argon2id is offered as a memory-hard alternative.  Whichever is used,
//! its name and cost parameters are written into the metadata bundle so
//! decryption reproduces the exact same key.

use argon2::{Algorithm, Argon2, Params as Argon2Params, Version};
use hmac::Hmac;
use sha2::Sha256;
use zeroize::Zeroize;

use super::keys::{DerivedKey, KEY_LEN};
use super::random::random_array;
use crate::errors::{DriveSealError, Result};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Reference PBKDF2 iteration count.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Wire name of the PBKDF2 variant.
pub const PBKDF2_SHA256: &str = "PBKDF2-SHA256";

/// Wire name of the Argon2id variant.
pub const ARGON2ID: &str = "Argon2id";

/// Minimum safe Argon2 memory cost in KiB (8 MB).
const MIN_ARGON2_MEMORY_KIB: u32 = 8_192;

/// Upper bounds on costs read back from a bundle.  Anything above these
/// would exhaust memory or stall the caller before the tag is checked.
pub const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;
pub const MAX_ARGON2_MEMORY_KIB: u32 = 1_048_576;
pub const MAX_ARGON2_ITERATIONS: u32 = 64;
pub const MAX_ARGON2_PARALLELISM: u32 = 16;

/// Which KDF to run, and at what cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfParams {
    Pbkdf2Sha256 {
        iterations: u32,
    },
    Argon2id {
        /// Memory cost in KiB.
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::Pbkdf2Sha256 {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Default Argon2id cost (64 MB, 3 passes, 4 lanes).
    pub fn argon2id_default() -> Self {
        Self::Argon2id {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }

    /// Name written into the `kdf` metadata field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pbkdf2Sha256 { .. } => PBKDF2_SHA256,
            Self::Argon2id { .. } => ARGON2ID,
        }
    }

    pub fn iterations(&self) -> u32 {
        match *self {
            Self::Pbkdf2Sha256 { iterations } | Self::Argon2id { iterations, .. } => iterations,
        }
    }

    /// Reject parameters that would silently weaken or break derivation.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Pbkdf2Sha256 { iterations } => {
                if iterations < 1 {
                    return Err(DriveSealError::InvalidKdfParameters(
                        "PBKDF2 iterations must be at least 1".into(),
                    ));
                }
                if iterations > MAX_PBKDF2_ITERATIONS {
                    return Err(DriveSealError::InvalidKdfParameters(format!(
                        "PBKDF2 iterations must be at most {MAX_PBKDF2_ITERATIONS} (got {iterations})"
                    )));
                }
            }
            Self::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                if memory_kib < MIN_ARGON2_MEMORY_KIB {
                    return Err(DriveSealError::InvalidKdfParameters(format!(
                        "Argon2 memory_kib must be at least {MIN_ARGON2_MEMORY_KIB} (got {memory_kib})"
                    )));
                }
                if memory_kib > MAX_ARGON2_MEMORY_KIB {
                    return Err(DriveSealError::InvalidKdfParameters(format!(
                        "Argon2 memory_kib must be at most {MAX_ARGON2_MEMORY_KIB} (got {memory_kib})"
                    )));
                }
                if !(1..=MAX_ARGON2_ITERATIONS).contains(&iterations) {
                    return Err(DriveSealError::InvalidKdfParameters(format!(
                        "Argon2 iterations must be between 1 and {MAX_ARGON2_ITERATIONS} (got {iterations})"
                    )));
                }
                if !(1..=MAX_ARGON2_PARALLELISM).contains(&parallelism) {
                    return Err(DriveSealError::InvalidKdfParameters(format!(
                        "Argon2 parallelism must be between 1 and {MAX_ARGON2_PARALLELISM} (got {parallelism})"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Derive a 256-bit key with PBKDF2-HMAC-SHA256.
///
/// Deterministic: the same password, salt and iteration count always
/// produce the same key.
pub fn derive(password: &[u8], salt: &[u8], iterations: u32) -> Result<DerivedKey> {
    derive_key(password, salt, &KdfParams::Pbkdf2Sha256 { iterations })
}

/// Derive a 256-bit key with explicit KDF parameters.
///
/// Fails before doing any work if the salt is not exactly 16 bytes or
/// the parameters are out of range.
pub fn derive_key(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    if salt.len() != SALT_LEN {
        return Err(DriveSealError::InvalidInputLength {
            field: "salt",
            expected: SALT_LEN,
            actual: salt.len(),
        });
    }
    params.validate()?;

    let mut key = [0u8; KEY_LEN];
    match *params {
        KdfParams::Pbkdf2Sha256 { iterations } => {
            pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut key).map_err(|e| {
                DriveSealError::InvalidKdfParameters(format!("PBKDF2 failed: {e}"))
            })?;
        }
        KdfParams::Argon2id {
            memory_kib,
            iterations,
            parallelism,
        } => {
            let argon_params = Argon2Params::new(memory_kib, iterations, parallelism, Some(KEY_LEN))
                .map_err(|e| {
                    DriveSealError::InvalidKdfParameters(format!("invalid Argon2 params: {e}"))
                })?;
            Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params)
                .hash_password_into(password, salt, &mut key)
                .map_err(|e| {
                    DriveSealError::InvalidKdfParameters(format!("Argon2id hashing failed: {e}"))
                })?;
        }
    }

    let derived = DerivedKey::new(key);
    key.zeroize();
    Ok(derived)
}

/// Generate a fresh 16-byte salt from the OS CSPRNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    random_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; SALT_LEN] = [7u8; SALT_LEN];

    #[test]
    fn derive_is_deterministic() {
        let k1 = derive(b"correct-horse", &SALT, 1_000).unwrap();
        let k2 = derive(b"correct-horse", &SALT, 1_000).unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn derive_matches_raw_pbkdf2() {
        let salt = *b"0123456789abcdef";
        let key = derive(b"passwd", &salt, 1).unwrap();
        let mut expected = [0u8; KEY_LEN];
        pbkdf2::pbkdf2::<Hmac<Sha256>>(b"passwd", &salt, 1, &mut expected).unwrap();
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn different_salt_gives_different_key() {
        let k1 = derive(b"pw", &[1u8; SALT_LEN], 10).unwrap();
        let k2 = derive(b"pw", &[2u8; SALT_LEN], 10).unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn different_iterations_give_different_key() {
        let k1 = derive(b"pw", &SALT, 10).unwrap();
        let k2 = derive(b"pw", &SALT, 11).unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn rejects_short_salt() {
        let err = derive(b"pw", &[0u8; 15], 10).unwrap_err();
        assert!(matches!(
            err,
            DriveSealError::InvalidInputLength {
                field: "salt",
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn rejects_long_salt() {
        assert!(derive(b"pw", &[0u8; 32], 10).is_err());
    }

    #[test]
    fn rejects_zero_iterations() {
        let err = derive(b"pw", &SALT, 0).unwrap_err();
        assert!(matches!(err, DriveSealError::InvalidKdfParameters(_)));
    }

    #[test]
    fn argon2id_rejects_low_memory() {
        let params = KdfParams::Argon2id {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };
        assert!(derive_key(b"pw", &SALT, &params).is_err());
    }

    #[test]
    fn costs_above_the_ceiling_are_rejected_without_deriving() {
        let too_many = KdfParams::Pbkdf2Sha256 {
            iterations: u32::MAX,
        };
        let too_much_memory = KdfParams::Argon2id {
            memory_kib: 268_435_455,
            iterations: 1,
            parallelism: 1,
        };
        let too_wide = KdfParams::Argon2id {
            memory_kib: MIN_ARGON2_MEMORY_KIB,
            iterations: 1,
            parallelism: 255,
        };
        for params in [too_many, too_much_memory, too_wide] {
            assert!(matches!(
                derive_key(b"pw", &SALT, &params).unwrap_err(),
                DriveSealError::InvalidKdfParameters(_)
            ));
        }
        assert!(KdfParams::argon2id_default().validate().is_ok());
        assert!(KdfParams::Pbkdf2Sha256 {
            iterations: MAX_PBKDF2_ITERATIONS
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn argon2id_differs_from_pbkdf2() {
        let argon = KdfParams::Argon2id {
            memory_kib: MIN_ARGON2_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        };
        let k1 = derive_key(b"pw", &SALT, &argon).unwrap();
        let k2 = derive(b"pw", &SALT, 1).unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn default_params_are_reference_pbkdf2() {
        let params = KdfParams::default();
        assert_eq!(params.name(), PBKDF2_SHA256);
        assert_eq!(params.iterations(), 100_000);
    }

    #[test]
    fn generate_salt_is_random() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}
