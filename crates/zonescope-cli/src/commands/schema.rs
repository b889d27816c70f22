//! Schema command implementation

use super::ensure_loaded;
use crate::config_loader::open_session;
use crate::output::OutputWriter;
use crate::output_types::SchemaOutput;
use anyhow::Result;
use tabled::Tabled;
use zonescope_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let session = open_session(config);
    if !ensure_loaded(&session, output) {
        return Ok(());
    }

    let schema = session.schema();

    if output.is_json() {
        return output.result(SchemaOutput {
            feature_count: session.features().len(),
            fields: &schema.entries,
        });
    }

    #[derive(Tabled)]
    struct FieldRow {
        #[tabled(rename = "Field")]
        key: String,
        #[tabled(rename = "Type")]
        kind: String,
        #[tabled(rename = "Distinct")]
        distinct: usize,
        #[tabled(rename = "Samples")]
        samples: String,
    }

    let rows: Vec<FieldRow> = schema
        .iter()
        .map(|entry| FieldRow {
            key: entry.key.clone(),
            kind: format!("{:?}", entry.kind),
            distinct: entry.distinct_count,
            samples: entry
                .samples
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    output.section(format!("Schema ({} features)", session.features().len()));
    output.table(rows);

    Ok(())
}
