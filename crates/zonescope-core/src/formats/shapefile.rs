//! Shapefile decoder
//!
//! Decodes an in-memory `.shp` geometry buffer and its `.dbf` attribute buffer
//! into features. Shapes become GeoJSON-shaped geometry values; attribute
//! columns keep their declared order.

use shapefile::dbase::{self, FieldValue};
use shapefile::{Point, Shape, ShapeReader};
use std::io::Cursor;

use crate::error::{Result, ZonescopeError};
use crate::models::{Feature, PropertyBag, PropertyValue};
use crate::ports::FeatureDecoder;

const FORMAT: &str = "Shapefile";

/// Decoder for ESRI Shapefile buffers
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapefileDecoder;

impl FeatureDecoder for ShapefileDecoder {
    fn decode(&self, geometry: &[u8], attributes: &[u8]) -> Result<Vec<Feature>> {
        let shape_reader = ShapeReader::new(Cursor::new(geometry))
            .map_err(|e| ZonescopeError::decode(FORMAT, format!("Invalid .shp data: {}", e)))?;

        let dbase_reader = dbase::Reader::new(Cursor::new(attributes))
            .map_err(|e| ZonescopeError::decode(FORMAT, format!("Invalid .dbf data: {}", e)))?;

        let columns: Vec<String> = dbase_reader
            .fields()
            .iter()
            .map(|field| field.name().to_string())
            .collect();

        let mut reader = shapefile::Reader::new(shape_reader, dbase_reader);
        let mut features = Vec::new();

        for result in reader.iter_shapes_and_records() {
            let (shape, record) = result.map_err(|e| {
                ZonescopeError::decode(
                    FORMAT,
                    format!("Failed to read feature {}: {}", features.len(), e),
                )
            })?;

            let geometry = shape_to_geojson(&shape)?;
            let properties: PropertyBag = columns
                .iter()
                .map(|name| {
                    let value = record
                        .get(name)
                        .map(convert_field_value)
                        .unwrap_or(PropertyValue::Null);
                    (name.clone(), value)
                })
                .collect();

            features.push(Feature {
                geometry,
                properties,
            });
        }

        tracing::debug!(features = features.len(), columns = columns.len(), "Decoded shapefile");
        Ok(features)
    }
}

fn xy(points: &[Point]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.x, p.y]).collect()
}

fn lines(parts: Vec<Vec<[f64; 2]>>) -> serde_json::Value {
    if parts.len() == 1 {
        serde_json::json!({ "type": "LineString", "coordinates": parts[0] })
    } else {
        serde_json::json!({ "type": "MultiLineString", "coordinates": parts })
    }
}

/// Convert a shape to a GeoJSON geometry value; Z and M ordinates are dropped
fn shape_to_geojson(shape: &Shape) -> Result<Option<serde_json::Value>> {
    let geometry = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => serde_json::json!({ "type": "Point", "coordinates": [p.x, p.y] }),
        Shape::PointM(p) => serde_json::json!({ "type": "Point", "coordinates": [p.x, p.y] }),
        Shape::PointZ(p) => serde_json::json!({ "type": "Point", "coordinates": [p.x, p.y] }),
        Shape::Polyline(line) => lines(line.parts().iter().map(|part| xy(part)).collect()),
        Shape::PolylineM(line) => lines(
            line.parts()
                .iter()
                .map(|part| part.iter().map(|p| [p.x, p.y]).collect())
                .collect(),
        ),
        Shape::PolylineZ(line) => lines(
            line.parts()
                .iter()
                .map(|part| part.iter().map(|p| [p.x, p.y]).collect())
                .collect(),
        ),
        Shape::Polygon(polygon) => {
            let rings: Vec<Vec<[f64; 2]>> =
                polygon.rings().iter().map(|ring| xy(ring.points())).collect();
            serde_json::json!({ "type": "Polygon", "coordinates": rings })
        }
        Shape::PolygonM(polygon) => {
            let rings: Vec<Vec<[f64; 2]>> = polygon
                .rings()
                .iter()
                .map(|ring| ring.points().iter().map(|p| [p.x, p.y]).collect())
                .collect();
            serde_json::json!({ "type": "Polygon", "coordinates": rings })
        }
        Shape::PolygonZ(polygon) => {
            let rings: Vec<Vec<[f64; 2]>> = polygon
                .rings()
                .iter()
                .map(|ring| ring.points().iter().map(|p| [p.x, p.y]).collect())
                .collect();
            serde_json::json!({ "type": "Polygon", "coordinates": rings })
        }
        Shape::Multipoint(points) => {
            serde_json::json!({ "type": "MultiPoint", "coordinates": xy(points.points()) })
        }
        Shape::MultipointM(points) => {
            let coordinates: Vec<[f64; 2]> = points.points().iter().map(|p| [p.x, p.y]).collect();
            serde_json::json!({ "type": "MultiPoint", "coordinates": coordinates })
        }
        Shape::MultipointZ(points) => {
            let coordinates: Vec<[f64; 2]> = points.points().iter().map(|p| [p.x, p.y]).collect();
            serde_json::json!({ "type": "MultiPoint", "coordinates": coordinates })
        }
        Shape::Multipatch(_) => {
            return Err(ZonescopeError::decode(
                FORMAT,
                "Multipatch geometry type is not supported",
            ))
        }
    };

    Ok(Some(geometry))
}

/// Convert a dBase field value to a property value
fn convert_field_value(value: &FieldValue) -> PropertyValue {
    match value {
        FieldValue::Character(Some(s)) => PropertyValue::Text(s.trim().to_string()),
        FieldValue::Character(None) => PropertyValue::Null,
        FieldValue::Numeric(Some(n)) => PropertyValue::Number(*n),
        FieldValue::Numeric(None) => PropertyValue::Null,
        FieldValue::Logical(Some(b)) => PropertyValue::Text(b.to_string()),
        FieldValue::Logical(None) => PropertyValue::Null,
        FieldValue::Date(Some(date)) => PropertyValue::Text(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        FieldValue::Date(None) => PropertyValue::Null,
        FieldValue::Float(Some(f)) => PropertyValue::Number(*f as f64),
        FieldValue::Float(None) => PropertyValue::Null,
        FieldValue::Integer(i) => PropertyValue::Number(*i as f64),
        FieldValue::Currency(c) => PropertyValue::Number(*c),
        FieldValue::DateTime(dt) => PropertyValue::Text(format!(
            "{:04}-{:02}-{:02}",
            dt.date().year(),
            dt.date().month(),
            dt.date().day()
        )),
        FieldValue::Double(d) => PropertyValue::Number(*d),
        FieldValue::Memo(s) => PropertyValue::Text(s.clone()),
    }
}
