//! Browse command implementation

use super::ensure_loaded;
use crate::cli::BrowseArgs;
use crate::config_loader::open_session;
use crate::output::OutputWriter;
use crate::output_types::BrowseOutput;
use anyhow::{Context, Result};
use zonescope_core::config::LayeredConfig;
use zonescope_core::{PageRequest, SortOrder};

/// Columns shown when none are requested
const DEFAULT_COLUMN_COUNT: usize = 6;

pub fn execute(args: BrowseArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let page_size = args.page_size.unwrap_or(config.page_size.value);
    let request = PageRequest::new(args.page, page_size).context("Invalid paging request")?;

    let mut session = open_session(config);
    if !ensure_loaded(&session, output) {
        return Ok(());
    }

    if let Some(term) = &args.search {
        session.set_search(term.as_str());
    }

    let order = if args.desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    if let Some(key) = args.sort.as_deref() {
        if session.schema().get(key).is_none() {
            output.warning(format!("Unknown sort field {}; rows with no value sort last", key));
        }
    }
    let page = session.page(request, args.sort.as_deref().map(|key| (key, order)));

    if output.is_json() {
        return output.result(BrowseOutput {
            search: session.state().search().to_string(),
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
            total_items: page.total_items,
            features: page.items.iter().map(|f| &f.properties).collect(),
        });
    }

    let columns: Vec<String> = if args.columns.is_empty() {
        session
            .schema()
            .iter()
            .take(DEFAULT_COLUMN_COUNT)
            .map(|entry| entry.key.clone())
            .collect()
    } else {
        args.columns.clone()
    };

    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|feature| {
            columns
                .iter()
                .map(|key| feature.get(key).map(|v| v.to_string()).unwrap_or_default())
                .collect()
        })
        .collect();

    output.section(format!(
        "Page {} of {} ({} matching features)",
        page.page, page.total_pages, page.total_items
    ));
    output.dynamic_table(columns, rows);

    if page.has_next() {
        output.info(format!("Next: --page {}", page.page + 1));
    }

    Ok(())
}
