//! cslint CLI
//!
//! Runs the CoffeeLint loader pipeline over files, acting as the host a
//! bundler would otherwise be.

mod cli;
mod commands;
mod host;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{CacheCommands, Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Lint(args) => commands::lint::run_lint(cli, args),
        Commands::Cache { command } => match command {
            CacheCommands::Clean => commands::cache::run_cache_clean(cli).map(|_| false),
        },
    }
}
