//! `driveseal seal` — encrypt a file for upload.
//!
//! Writes two files: the ciphertext and, beside it, the JSON metadata
//! bundle.  Both must be uploaded; the bundle is never embedded in the
//! ciphertext.

use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::cli::{discard, ensure_writable, prompt_new_password, read_input, write_atomic};
use crate::config::Settings;
use crate::crypto::digest;
use crate::envelope::worker;
use crate::errors::Result;

/// Execute the `seal` command.
pub fn execute(
    file: &str,
    output_path: Option<&str>,
    metadata_path: Option<&str>,
    kdf: Option<&str>,
    file_id: Option<&str>,
    force: bool,
) -> Result<()> {
    let input = Path::new(file);
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;

    // 1. Resolve output locations and refuse to clobber.
    let out = output_path
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.encrypted_path(input));
    let meta_out = metadata_path
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.metadata_path(&out));
    ensure_writable(&out, force)?;
    ensure_writable(&meta_out, force)?;

    // 2. Resolve KDF parameters before prompting.
    let params = settings.kdf_params(kdf)?;
    let plaintext = read_input(input)?;
    let password = prompt_new_password()?;

    // 3. Encrypt off the main thread.
    let sealed = worker::spawn_encrypt(
        plaintext,
        password,
        params,
        file_id.map(|id| id.as_bytes().to_vec()),
    )?
    .wait()?;

    // 4. Persist metadata, then ciphertext.  A ciphertext must never be
    //    left on disk without the bundle needed to open it.
    write_atomic(&meta_out, sealed.metadata_text.as_bytes(), false)?;
    if let Err(e) = write_atomic(&out, &sealed.ciphertext, false) {
        discard(&meta_out);
        return Err(e);
    }

    tracing::info!(
        input = %input.display(),
        ciphertext = %out.display(),
        bytes = sealed.ciphertext.len(),
        "sealed file"
    );

    output::success(&format!(
        "Sealed {} -> {} ({} bytes, {})",
        input.display(),
        out.display(),
        sealed.ciphertext.len(),
        params.name()
    ));
    output::info(&format!("Metadata written to {}", meta_out.display()));
    output::tip(&format!(
        "Ciphertext SHA-256: {}",
        digest::digest(&sealed.ciphertext)
    ));

    Ok(())
}
