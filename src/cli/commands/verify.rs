//! `driveseal verify` — compare a file against an expected SHA-256.

use std::path::Path;

use crate::cli::{output, read_input};
use crate::crypto::digest;
use crate::errors::{DriveSealError, Result};

/// Execute the `verify` command.
pub fn execute(file: &str, expected: &str) -> Result<()> {
    let data = read_input(Path::new(file))?;

    if !digest::verify(&data, expected) {
        return Err(DriveSealError::IntegrityMismatch);
    }

    output::success(&format!("{file} matches the expected digest"));
    Ok(())
}
