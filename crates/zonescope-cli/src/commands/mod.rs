//! Command implementations

mod browse;
mod cache;
mod config;
mod groups;
mod load;
mod rank;
mod schema;
mod stats;
mod summary;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;
use zonescope_core::{FeatureCache, Session};

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Load(args) => load::execute(args, &config, &output),
        Commands::Schema => schema::execute(&config, &output),
        Commands::Groups(args) => groups::execute(args, &config, &output),
        Commands::Summary(args) => summary::execute(args, &config, &output),
        Commands::Rank(args) => rank::execute(args, &config, &output),
        Commands::Browse(args) => browse::execute(args, &config, &output),
        Commands::Stats(args) => stats::execute(args, &config, &output),
        Commands::Cache(args) => cache::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

/// Report when no collection is loaded. Returns true if the session has features.
fn ensure_loaded<C: FeatureCache>(session: &Session<C>, output: &OutputWriter) -> bool {
    if session.features().is_empty() {
        output.warning("No cached features. Run `zonescope load <path>` first.");
        return false;
    }
    true
}
