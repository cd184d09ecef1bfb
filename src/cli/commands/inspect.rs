//! `driveseal inspect` — decode a metadata bundle without decrypting.

use std::path::Path;

use crate::cli::{output, read_input};
use crate::envelope::Metadata;
use crate::errors::Result;

/// Execute the `inspect` command.
pub fn execute(metadata_path: &str) -> Result<()> {
    let raw = read_input(Path::new(metadata_path))?;
    let meta = Metadata::decode(&String::from_utf8_lossy(&raw))?;

    output::print_metadata_table(&meta);

    if let Err(e) = meta.ensure_supported_algorithm() {
        output::warning(&e.to_string());
    }
    Ok(())
}
