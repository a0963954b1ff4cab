//! marginalia CLI - merge annotation-library backups
//!
//! Imports two backups of the same annotation database taken on different
//! devices, reconciles them, and writes a single merged backup.

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("marginalia=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            left,
            right,
            dest,
            prefer,
            device_name,
        } => commands::merge::run_merge(&left, &right, &dest, prefer, &device_name)?,
        Commands::Stats { backup, json } => commands::stats::run_stats(&backup, json)?,
        Commands::Completions { shell, output } => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
