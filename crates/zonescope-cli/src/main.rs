//! Zonescope CLI - Command-line interface
//!
//! Loads school zone shapefiles into the feature cache and runs the analytics
//! engine over the cached collection.

mod cli;
mod commands;
mod config_loader;
mod output;
mod output_types;

use clap::Parser;
use cli::Cli;
use output::OutputWriter;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    let json = cli.json;
    match commands::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            OutputWriter::new(json).error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
