//! `driveseal version` — display version and crypto defaults.

use console::style;

use crate::crypto::encryption::AES_256_GCM;
use crate::crypto::kdf::KdfParams;
use crate::errors::Result;

/// Execute the `version` command.
pub fn execute() -> Result<()> {
    let current = env!("CARGO_PKG_VERSION");
    println!("driveseal {current}");

    let kdf = KdfParams::default();
    println!(
        "{} {AES_256_GCM}, {} ({} iterations)",
        style("defaults:").dim(),
        kdf.name(),
        kdf.iterations()
    );

    Ok(())
}
