use clap::Parser;
use driveseal::cli::{commands, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    driveseal::logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Seal {
            ref file,
            ref output,
            ref metadata,
            ref kdf,
            ref file_id,
            force,
        } => commands::seal::execute(
            file,
            output.as_deref(),
            metadata.as_deref(),
            kdf.as_deref(),
            file_id.as_deref(),
            force,
        ),
        Commands::Open {
            ref file,
            ref metadata,
            ref output,
            ref file_id,
            force,
        } => commands::open::execute(
            file,
            metadata.as_deref(),
            output.as_deref(),
            file_id.as_deref(),
            force,
        ),
        Commands::Digest { ref file, hex } => commands::digest::execute(file, hex),
        Commands::Verify {
            ref file,
            ref expected,
        } => commands::verify::execute(file, expected),
        Commands::Inspect { ref metadata } => commands::inspect::execute(metadata),
        Commands::Version => commands::version::execute(),
        Commands::Completions { ref shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        tracing::debug!(kind = ?e.kind(), "command failed");
        driveseal::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
