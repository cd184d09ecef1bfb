//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;

use zeroize::Zeroizing;

use crate::errors::{DriveSealError, Result};

/// Minimum password length for sealing new files.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable that supplies the password non-interactively.
pub const PASSWORD_ENV: &str = "DRIVESEAL_PASSWORD";

/// DriveSeal CLI: client-side file encryption for untrusted storage.
#[derive(Parser)]
#[command(
    name = "driveseal",
    about = "Client-side file encryption for untrusted storage",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Encrypt a file, writing ciphertext and metadata side by side
    Seal {
        /// File to encrypt
        file: String,

        /// Ciphertext output path (default: <file>.enc)
        #[arg(short, long)]
        output: Option<String>,

        /// Metadata output path (default: <output>.meta.json)
        #[arg(short, long)]
        metadata: Option<String>,

        /// KDF to use: pbkdf2-sha256 or argon2id (default from config)
        #[arg(long)]
        kdf: Option<String>,

        /// Bind this file identifier into the ciphertext
        #[arg(long)]
        file_id: Option<String>,

        /// Overwrite existing output files
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt a file using its metadata bundle
    Open {
        /// Ciphertext file
        file: String,

        /// Metadata bundle path (default: <file>.meta.json)
        #[arg(short, long)]
        metadata: Option<String>,

        /// Plaintext output path, or "-" for stdout (default: <file> without .enc)
        #[arg(short, long)]
        output: Option<String>,

        /// File identifier the ciphertext was bound to
        #[arg(long)]
        file_id: Option<String>,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the SHA-256 digest of a file
    Digest {
        /// File to hash
        file: String,

        /// Print hex instead of base64
        #[arg(long)]
        hex: bool,
    },

    /// Check a file against an expected SHA-256 digest
    Verify {
        /// File to check
        file: String,

        /// Expected digest (base64 or hex)
        expected: String,
    },

    /// Decode a metadata bundle and show its fields
    Inspect {
        /// Metadata bundle path
        metadata: String,
    },

    /// Show version
    Version,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the password for opening a file, trying in order:
/// 1. `DRIVESEAL_PASSWORD` env var (CI/CD)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter file password")
        .interact()
        .map_err(|e| DriveSealError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used by `seal`).
///
/// Also respects `DRIVESEAL_PASSWORD` for scripted/CI usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        if pw.len() < MIN_PASSWORD_LEN {
            return Err(DriveSealError::CommandFailed(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose file password")
            .with_confirmation(
                "Confirm file password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| DriveSealError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Read an input file, mapping a missing path to `FileNotFound`.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(DriveSealError::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

/// Fail if `path` exists and `force` was not given.
pub fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(DriveSealError::FileExists(path.to_path_buf()));
    }
    Ok(())
}

/// Write `data` to `path` **atomically** via a temp file and rename.
///
/// When `private` is set the temp file is created owner read/write only
/// on Unix (used for recovered plaintext), so the data is never readable
/// by others at any point.  The temp file is removed if anything fails.
pub fn write_atomic(path: &Path, data: &[u8], private: bool) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    // A stale temp file may carry looser permissions; start fresh.
    match fs::remove_file(&tmp_path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
        _ => {}
    }

    let result = write_new_file(&tmp_path, data, private)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(Into::into));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_new_file(path: &Path, data: &[u8], private: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    if private {
        owner_only(&mut options);
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600);
}

#[cfg(not(unix))]
fn owner_only(_options: &mut OpenOptions) {}

/// Remove a file written earlier in a command that then failed.
pub fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
    }
}
