//! Stats command implementation

use super::ensure_loaded;
use crate::cli::StatsArgs;
use crate::config_loader::open_session;
use crate::output::{format_number, OutputWriter};
use crate::output_types::StatsOutput;
use anyhow::Result;
use zonescope_core::config::LayeredConfig;
use zonescope_core::describe_field;

pub fn execute(args: StatsArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut session = open_session(config);
    if !ensure_loaded(&session, output) {
        return Ok(());
    }

    if let Some(term) = &args.search {
        session.set_search(term.as_str());
    }

    let stats = describe_field(session.filtered_features(), &args.field);

    if output.is_json() {
        return output.result(StatsOutput {
            search: session.state().search().to_string(),
            stats,
        });
    }

    match stats {
        Some(stats) => {
            output.section(format!("{} ({} numeric values)", stats.key, stats.count));
            output.kv("Sum", format_number(stats.sum));
            output.kv("Min", format_number(stats.min));
            output.kv("Max", format_number(stats.max));
            output.kv("Mean", format_number(stats.mean));
        }
        None => output.info(format!("No numeric values for {}", args.field)),
    }

    Ok(())
}
