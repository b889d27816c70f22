//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::{ConfigOutput, ConfigValue};
use anyhow::Result;
use std::collections::BTreeMap;
use tabled::Tabled;
use zonescope_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let values: BTreeMap<String, ConfigValue> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| {
            (
                key,
                ConfigValue {
                    value,
                    source: format!("{:?}", source),
                },
            )
        })
        .collect();

    if output.is_json() {
        return output.result(ConfigOutput { values });
    }

    #[derive(Tabled)]
    struct ConfigRow {
        #[tabled(rename = "Setting")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Source")]
        source: String,
    }

    output.section("Effective Configuration");
    output.table(
        values
            .into_iter()
            .map(|(key, v)| ConfigRow {
                key,
                value: v.value,
                source: v.source,
            })
            .collect(),
    );

    Ok(())
}
