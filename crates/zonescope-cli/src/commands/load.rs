//! Load command implementation

use crate::cli::LoadArgs;
use crate::config_loader::{default_dbf_path, file_cache};
use crate::output::OutputWriter;
use crate::output_types::LoadOutput;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use zonescope_core::config::LayeredConfig;
use zonescope_core::formats::{parse_features, ShapefileDecoder};
use zonescope_core::Session;

pub fn execute(args: LoadArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    if !args.path.exists() {
        bail!("File not found: {}", args.path.display());
    }

    let cache = file_cache(config);
    let mut session = Session::new(cache.clone(), config.fields.value.clone());

    let count = match source_kind(&args.path)? {
        SourceKind::Shapefile => {
            let dbf = args.dbf.clone().unwrap_or_else(|| default_dbf_path(&args.path));
            let geometry = fs::read(&args.path)
                .with_context(|| format!("Failed to read {}", args.path.display()))?;
            let attributes =
                fs::read(&dbf).with_context(|| format!("Failed to read {}", dbf.display()))?;

            tracing::info!(shp = %args.path.display(), dbf = %dbf.display(), "Decoding shapefile");
            session
                .ingest(&ShapefileDecoder, &geometry, &attributes)
                .context("Failed to decode shapefile")?
        }
        SourceKind::GeoJson => {
            if args.dbf.is_some() {
                output.warning("--dbf is ignored for GeoJSON input");
            }
            let text = fs::read_to_string(&args.path)
                .with_context(|| format!("Failed to read {}", args.path.display()))?;
            let (features, _) = parse_features(&text).context("Failed to decode GeoJSON")?;
            session.replace_features(features)
        }
    };

    let cached = session.is_persisted();
    if !cached {
        output.warning(format!(
            "Features were loaded but could not be cached at {}",
            cache.path().display()
        ));
    }

    let result = LoadOutput {
        source: args.path.display().to_string(),
        feature_count: count,
        column_count: session.schema().len(),
        group_count: session.index().len(),
        ungrouped_count: session.index().ungrouped_count(),
        cached,
    };

    if output.is_json() {
        output.result(result)?;
    } else {
        output.success(format!("Loaded {} features from {}", result.feature_count, result.source));
        output.kv("Columns", result.column_count);
        output.kv("ZIP groups", result.group_count);
        if result.ungrouped_count > 0 {
            output.kv("Without ZIP", result.ungrouped_count);
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum SourceKind {
    Shapefile,
    GeoJson,
}

fn source_kind(path: &Path) -> Result<SourceKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "shp" => Ok(SourceKind::Shapefile),
        "geojson" | "json" => Ok(SourceKind::GeoJson),
        _ => bail!(
            "Unsupported input {}: expected a .shp, .geojson or .json file",
            path.display()
        ),
    }
}
