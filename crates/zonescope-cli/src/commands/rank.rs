//! Rank command implementation

use super::ensure_loaded;
use crate::cli::RankArgs;
use crate::config_loader::open_session;
use crate::output::{format_number, OutputWriter};
use crate::output_types::RankOutput;
use anyhow::{Context, Result};
use tabled::Tabled;
use zonescope_core::config::LayeredConfig;
use zonescope_core::{GroupKey, Metric};

pub fn execute(args: RankArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let metric: Metric = args.metric.parse().context("Invalid --metric")?;
    let top_n = args.top.unwrap_or(config.top_n.value);

    let mut session = open_session(config);
    if !ensure_loaded(&session, output) {
        return Ok(());
    }

    // Without explicit ZIPs every group competes
    let candidates: Vec<GroupKey> = if args.zips.is_empty() {
        session.index().sorted_keys().into_iter().cloned().collect()
    } else {
        args.zips.iter().map(|z| GroupKey::from(z.trim())).collect()
    };
    let (known, unknown): (Vec<GroupKey>, Vec<GroupKey>) = candidates
        .into_iter()
        .partition(|key| session.index().contains(key.as_str()));
    for key in &unknown {
        output.warning(format!("No features with ZIP {}", key));
    }
    session.select_groups(known);

    let ranked = session.ranking(&metric, top_n);

    if output.is_json() {
        return output.result(RankOutput {
            metric: metric.to_string(),
            groups: ranked,
        });
    }

    #[derive(Tabled)]
    struct RankRow {
        #[tabled(rename = "#")]
        position: usize,
        #[tabled(rename = "ZIP")]
        zip: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    output.section(format!("Top {} by {}", top_n, metric));
    output.table(
        ranked
            .into_iter()
            .enumerate()
            .map(|(i, group)| RankRow {
                position: i + 1,
                zip: group.key.to_string(),
                value: group.value.map(format_number).unwrap_or_else(|| "n/a".to_string()),
            })
            .collect(),
    );

    Ok(())
}
