//! Diagnostic logging setup for the `driveseal` binary.
//!
//! Library code only emits `tracing` events.  Events carry sizes,
//! algorithm names and KDF costs, never passwords, keys or plaintext.
//! Output goes to stderr so stdout stays clean for piped data.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "DRIVESEAL_LOG";

/// Install the global subscriber.
///
/// `verbose` raises the default level from `warn` to `debug`; an explicit
/// `DRIVESEAL_LOG` or `RUST_LOG` filter always wins.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
