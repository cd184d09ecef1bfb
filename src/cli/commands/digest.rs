//! `driveseal digest` — print a file's SHA-256.

use std::path::Path;

use crate::cli::read_input;
use crate::crypto::digest;
use crate::errors::Result;

/// Execute the `digest` command.
pub fn execute(file: &str, hex: bool) -> Result<()> {
    let data = read_input(Path::new(file))?;
    let hash = if hex {
        digest::digest_hex(&data)
    } else {
        digest::digest(&data)
    };
    println!("{hash}");
    Ok(())
}
