use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

#[path = "main/cli.rs"]
mod cli;
#[path = "main/commands.rs"]
mod commands;

use cli::Cli;

fn main() -> ExitCode {
    // IDESCRIPTIVE_LOG takes the usual filter syntax, e.g. `idescriptive=debug`
    if let Ok(filter) = EnvFilter::try_from_env("IDESCRIPTIVE_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .without_time()
            .compact()
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();
    commands::cmd_check(&cli)
}
