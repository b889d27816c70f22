//! Groups command implementation

use super::ensure_loaded;
use crate::cli::GroupsArgs;
use crate::config_loader::open_session;
use crate::output::{format_number, OutputWriter};
use crate::output_types::{GroupInfo, GroupsOutput};
use anyhow::Result;
use tabled::Tabled;
use zonescope_core::config::LayeredConfig;
use zonescope_core::summarize_group;

pub fn execute(args: GroupsArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let session = open_session(config);
    if !ensure_loaded(&session, output) {
        return Ok(());
    }

    let index = session.index();
    let keys = match args.search.as_deref() {
        Some(term) => index.keys_matching(term),
        None => index.sorted_keys(),
    };

    let groups: Vec<GroupInfo> = keys
        .into_iter()
        .filter_map(|key| index.get(key.as_str()))
        .map(|aggregate| {
            let summary = summarize_group(aggregate);
            GroupInfo {
                zip: aggregate.key.to_string(),
                records: aggregate.record_count(),
                total: summary.total,
                female: summary.totals.female,
                male: summary.totals.male,
                schools: summary.totals.schools,
            }
        })
        .collect();

    if output.is_json() {
        return output.result(GroupsOutput {
            groups,
            ungrouped_count: index.ungrouped_count(),
        });
    }

    #[derive(Tabled)]
    struct GroupRow {
        #[tabled(rename = "ZIP")]
        zip: String,
        #[tabled(rename = "Records")]
        records: usize,
        #[tabled(rename = "Total")]
        total: String,
        #[tabled(rename = "Female")]
        female: String,
        #[tabled(rename = "Male")]
        male: String,
        #[tabled(rename = "Schools")]
        schools: String,
    }

    output.section(format!("ZIP Groups ({})", groups.len()));
    output.table(
        groups
            .into_iter()
            .map(|g| GroupRow {
                zip: g.zip,
                records: g.records,
                total: format_number(g.total),
                female: format_number(g.female),
                male: format_number(g.male),
                schools: format_number(g.schools),
            })
            .collect(),
    );

    if index.ungrouped_count() > 0 {
        output.info(format!(
            "{} features have no ZIP and are not grouped",
            index.ungrouped_count()
        ));
    }

    Ok(())
}
