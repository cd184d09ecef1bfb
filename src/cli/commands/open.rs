//! `driveseal open` — decrypt a downloaded file.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::cli::{ensure_writable, prompt_password, read_input, write_atomic};
use crate::config::Settings;
use crate::envelope::worker;
use crate::errors::Result;

/// Execute the `open` command.
pub fn execute(
    file: &str,
    metadata_path: Option<&str>,
    output_path: Option<&str>,
    file_id: Option<&str>,
    force: bool,
) -> Result<()> {
    let input = Path::new(file);
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;

    let meta_in = metadata_path
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.metadata_path(input));
    let to_stdout = output_path == Some("-");
    let out = output_path
        .filter(|_| !to_stdout)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.decrypted_path(input));
    if !to_stdout {
        ensure_writable(&out, force)?;
    }

    // 1. Read ciphertext and its metadata bundle.
    let ciphertext = read_input(input)?;
    let metadata_text = String::from_utf8_lossy(&read_input(&meta_in)?).into_owned();

    // 2. Decrypt off the main thread.
    let password = prompt_password()?;
    let plaintext = worker::spawn_decrypt(
        ciphertext,
        metadata_text,
        password,
        file_id.map(|id| id.as_bytes().to_vec()),
    )?
    .wait()?;

    // 3. Emit the plaintext.
    if to_stdout {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&plaintext)?;
        stdout.flush()?;
        return Ok(());
    }

    write_atomic(&out, &plaintext, true)?;
    tracing::info!(ciphertext = %input.display(), output = %out.display(), "opened file");
    output::success(&format!(
        "Opened {} -> {} ({} bytes)",
        input.display(),
        out.display(),
        plaintext.len()
    ));

    Ok(())
}
