//! Operating-system CSPRNG access.
//!
//! Every salt and nonce in DriveSeal comes from here.  A failure of the
//! OS generator is surfaced as `RandomSourceUnavailable`; there is no
//! fallback to a weaker generator.

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{DriveSealError, Result};

/// Fill `buf` with bytes from the operating system CSPRNG.
pub fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| DriveSealError::RandomSourceUnavailable(e.to_string()))
}

/// Return `N` fresh random bytes.
pub fn random_array<const N: usize>() -> Result<[u8; N]> {
    let mut out = [0u8; N];
    fill_random(&mut out)?;
    Ok(out)
}
