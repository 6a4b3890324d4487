//! rhasspy-supervisor - Rhasspy profile compiler
//!
//! Reads a two-layer Rhasspy profile, decides which process implements each
//! stage of the voice pipeline, and renders the result as a supervisord
//! configuration and a docker-compose file.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod broker;
mod builders;
mod cli;
mod commands;
mod error;
mod process;
mod profile;
mod render;
mod shell;
mod site_ids;
mod stage;
mod topology;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compile(args) => commands::compile::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
