use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, DEFAULT_PBKDF2_ITERATIONS};
use crate::errors::{DriveSealError, Result};

/// Project-level configuration, loaded from `.driveseal.toml`.
///
/// Every field has a sensible default so DriveSeal works out-of-the-box
/// without any config file at all.  These values only choose how *new*
/// files are sealed; decryption always follows the metadata bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// KDF for new files: "pbkdf2-sha256" (default) or "argon2id".
    #[serde(default = "default_kdf")]
    pub kdf: String,

    /// PBKDF2 iteration count (default: 100 000).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Suffix appended to a file name for its ciphertext.
    #[serde(default = "default_encrypted_suffix")]
    pub encrypted_suffix: String,

    /// Suffix appended to a file name for its metadata bundle.
    #[serde(default = "default_metadata_suffix")]
    pub metadata_suffix: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_kdf() -> String {
    "pbkdf2-sha256".to_string()
}

fn default_pbkdf2_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_encrypted_suffix() -> String {
    ".enc".to_string()
}

fn default_metadata_suffix() -> String {
    ".meta.json".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            kdf: default_kdf(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            encrypted_suffix: default_encrypted_suffix(),
            metadata_suffix: default_metadata_suffix(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".driveseal.toml";

    /// Load settings from `<project_dir>/.driveseal.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            DriveSealError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), kdf = %settings.kdf, "loaded settings");
        Ok(settings)
    }

    /// Convert the configured KDF into crypto-layer params.
    ///
    /// `override_kdf` (from the command line) takes precedence over the
    /// file's `kdf` field.
    pub fn kdf_params(&self, override_kdf: Option<&str>) -> Result<KdfParams> {
        let name = override_kdf.unwrap_or(&self.kdf);
        let params = match name.to_ascii_lowercase().as_str() {
            "pbkdf2-sha256" | "pbkdf2" => KdfParams::Pbkdf2Sha256 {
                iterations: self.pbkdf2_iterations,
            },
            "argon2id" | "argon2" => KdfParams::Argon2id {
                memory_kib: self.argon2_memory_kib,
                iterations: self.argon2_iterations,
                parallelism: self.argon2_parallelism,
            },
            other => {
                return Err(DriveSealError::ConfigError(format!(
                    "unknown kdf '{other}', expected pbkdf2-sha256 or argon2id"
                )))
            }
        };
        params
            .validate()
            .map_err(|e| DriveSealError::ConfigError(e.to_string()))?;
        Ok(params)
    }

    /// Where the ciphertext for `input` is written by default.
    ///
    /// Example: `report.pdf` -> `report.pdf.enc`
    pub fn encrypted_path(&self, input: &Path) -> PathBuf {
        append_suffix(input, &self.encrypted_suffix)
    }

    /// Where the metadata bundle for `ciphertext` lives by default.
    ///
    /// Example: `report.pdf.enc` -> `report.pdf.enc.meta.json`
    pub fn metadata_path(&self, ciphertext: &Path) -> PathBuf {
        append_suffix(ciphertext, &self.metadata_suffix)
    }

    /// Where the plaintext recovered from `ciphertext` is written by default.
    ///
    /// Strips the encrypted suffix if present, otherwise appends `.out`.
    pub fn decrypted_path(&self, ciphertext: &Path) -> PathBuf {
        let name = ciphertext.to_string_lossy();
        match name.strip_suffix(self.encrypted_suffix.as_str()) {
            Some(stem) if !stem.is_empty() => PathBuf::from(stem),
            _ => append_suffix(ciphertext, ".out"),
        }
    }
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.kdf, "pbkdf2-sha256");
        assert_eq!(s.pbkdf2_iterations, 100_000);
        assert_eq!(s.argon2_memory_kib, 65_536);
        assert_eq!(s.argon2_iterations, 3);
        assert_eq!(s.argon2_parallelism, 4);
        assert_eq!(s.encrypted_suffix, ".enc");
        assert_eq!(s.metadata_suffix, ".meta.json");
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.kdf, "pbkdf2-sha256");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
kdf = "argon2id"
pbkdf2_iterations = 600000
argon2_memory_kib = 131072
argon2_iterations = 5
argon2_parallelism = 8
encrypted_suffix = ".sealed"
"#;
        fs::write(tmp.path().join(".driveseal.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.kdf, "argon2id");
        assert_eq!(settings.pbkdf2_iterations, 600_000);
        assert_eq!(settings.argon2_memory_kib, 131_072);
        assert_eq!(settings.argon2_iterations, 5);
        assert_eq!(settings.argon2_parallelism, 8);
        assert_eq!(settings.encrypted_suffix, ".sealed");
        assert_eq!(settings.metadata_suffix, ".meta.json");
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".driveseal.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn kdf_params_defaults_to_reference_pbkdf2() {
        let params = Settings::default().kdf_params(None).unwrap();
        assert_eq!(params, KdfParams::Pbkdf2Sha256 { iterations: 100_000 });
    }

    #[test]
    fn kdf_params_honours_override() {
        let params = Settings::default().kdf_params(Some("Argon2id")).unwrap();
        assert_eq!(params, KdfParams::argon2id_default());
    }

    #[test]
    fn kdf_params_rejects_unknown_name() {
        assert!(Settings::default().kdf_params(Some("scrypt")).is_err());
    }

    #[test]
    fn kdf_params_rejects_zero_iterations() {
        let s = Settings {
            pbkdf2_iterations: 0,
            ..Settings::default()
        };
        assert!(matches!(
            s.kdf_params(None).unwrap_err(),
            DriveSealError::ConfigError(_)
        ));
    }

    #[test]
    fn derived_paths() {
        let s = Settings::default();
        let enc = s.encrypted_path(Path::new("docs/report.pdf"));
        assert_eq!(enc, PathBuf::from("docs/report.pdf.enc"));
        assert_eq!(
            s.metadata_path(&enc),
            PathBuf::from("docs/report.pdf.enc.meta.json")
        );
        assert_eq!(s.decrypted_path(&enc), PathBuf::from("docs/report.pdf"));
        assert_eq!(
            s.decrypted_path(Path::new("blob.bin")),
            PathBuf::from("blob.bin.out")
        );
    }
}
