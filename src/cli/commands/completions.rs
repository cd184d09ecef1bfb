//! `driveseal completions` — generate shell completion scripts.
//!
//! Usage:
//!   driveseal completions bash > ~/.bash_completion.d/driveseal
//!   driveseal completions zsh

use std::io;

use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{DriveSealError, Result};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "driveseal", &mut io::stdout());
    Ok(())
}

/// Parse a shell name (case-insensitive; "ps" is accepted for PowerShell).
fn parse_shell(name: &str) -> Result<Shell> {
    let name = if name.eq_ignore_ascii_case("ps") {
        "powershell"
    } else {
        name
    };
    <Shell as ValueEnum>::from_str(name, true).map_err(|_| {
        DriveSealError::CommandFailed(format!(
            "unknown shell '{name}', supported: bash, zsh, fish, powershell, elvish"
        ))
    })
}
