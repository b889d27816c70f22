//! Summary command implementation

use super::ensure_loaded;
use crate::cli::SummaryArgs;
use crate::config_loader::open_session;
use crate::output::{format_number, OutputWriter};
use crate::output_types::SummaryOutput;
use anyhow::Result;
use zonescope_core::config::LayeredConfig;
use zonescope_core::GroupKey;

pub fn execute(args: SummaryArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut session = open_session(config);
    if !ensure_loaded(&session, output) {
        return Ok(());
    }

    let (known, unknown): (Vec<String>, Vec<String>) = args
        .zips
        .into_iter()
        .map(|zip| zip.trim().to_string())
        .partition(|zip| session.index().contains(zip));
    session.select_groups(known.into_iter().map(GroupKey::from));

    for zip in &unknown {
        output.warning(format!("No features with ZIP {}", zip));
    }

    let selection: Vec<String> = session
        .state()
        .selection()
        .keys()
        .iter()
        .map(|k| k.to_string())
        .collect();
    let summary = session.selection_summary();

    if output.is_json() {
        return output.result(SummaryOutput {
            selection,
            unknown,
            summary,
        });
    }

    if summary.is_empty() {
        output.info("Selection is empty");
        return Ok(());
    }

    output.section(format!("Selection: {}", selection.join(", ")));
    output.kv("Records", summary.record_count());
    output.kv("Total students", format_number(summary.total));
    output.kv("Female", format_number(summary.totals.female));
    output.kv("Male", format_number(summary.totals.male));
    output.kv("Female/male ratio", summary.female_male_ratio);
    output.kv("Schools", format_number(summary.totals.schools));
    output.kv("Students per school", format_number(summary.average_per_school));
    output.kv("Student/teacher ratio", summary.average_ratio);

    output.section("Grades");
    for (grade, count) in &summary.totals.grades {
        output.kv(grade, format_number(*count));
    }

    Ok(())
}
