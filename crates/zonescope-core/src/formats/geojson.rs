//! GeoJSON FeatureCollection codec

use geojson::{FeatureCollection, GeoJson, Geometry, JsonObject};

use crate::error::{Result, ZonescopeError};
use crate::models::{Feature, PropertyBag, PropertyValue};

const FORMAT: &str = "GeoJSON";

/// Build a GeoJSON FeatureCollection from features.
///
/// Fails if a feature's geometry is not a valid GeoJSON geometry object.
pub fn features_to_collection(
    features: &[Feature],
    foreign_members: Option<JsonObject>,
) -> Result<FeatureCollection> {
    let features = features
        .iter()
        .enumerate()
        .map(|(idx, feature)| {
            let geometry = feature
                .geometry
                .clone()
                .map(Geometry::from_json_value)
                .transpose()
                .map_err(|e| {
                    ZonescopeError::Serialization(format!(
                        "Feature {} has invalid geometry: {}",
                        idx, e
                    ))
                })?;

            let properties: JsonObject = feature
                .properties
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect();

            Ok(geojson::Feature {
                bbox: None,
                geometry,
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members,
    })
}

/// Serialize features as GeoJSON text
pub fn write_features(features: &[Feature], foreign_members: Option<JsonObject>) -> Result<String> {
    let collection = features_to_collection(features, foreign_members)?;
    Ok(GeoJson::FeatureCollection(collection).to_string())
}

/// Convert a parsed FeatureCollection back into features
pub fn collection_to_features(collection: &FeatureCollection) -> Vec<Feature> {
    collection.features.iter().map(convert_feature).collect()
}

/// Parse GeoJSON text into features.
///
/// Accepts a FeatureCollection, a single Feature, or a bare Geometry (which
/// becomes a feature with no properties).
pub fn parse_features(text: &str) -> Result<(Vec<Feature>, Option<JsonObject>)> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e| ZonescopeError::decode(FORMAT, format!("Failed to parse GeoJSON: {}", e)))?;

    match geojson {
        GeoJson::FeatureCollection(collection) => Ok((
            collection_to_features(&collection),
            collection.foreign_members,
        )),
        GeoJson::Feature(feature) => Ok((vec![convert_feature(&feature)], None)),
        GeoJson::Geometry(geometry) => {
            let geometry = serde_json::to_value(&geometry).map_err(|e| {
                ZonescopeError::Serialization(format!("Failed to serialize geometry: {}", e))
            })?;
            Ok((vec![Feature::with_geometry(geometry, PropertyBag::new())], None))
        }
    }
}

fn convert_feature(feature: &geojson::Feature) -> Feature {
    let geometry = feature
        .geometry
        .as_ref()
        .and_then(|geometry| serde_json::to_value(geometry).ok());

    let properties: PropertyBag = feature
        .properties
        .iter()
        .flatten()
        .map(|(key, value)| (key.clone(), PropertyValue::from_json(value)))
        .collect();

    Feature {
        geometry,
        properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "savedAt": "2024-01-01T00:00:00Z",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-96.8, 32.9]},
                "properties": {"Zip": "75001", "Female": 10, "Male": 5, "Note": null}
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {"Zip": 75002, "Open": true}
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let (features, foreign) = parse_features(SAMPLE).unwrap();
        assert_eq!(features.len(), 2);
        assert!(features[0].has_geometry());
        assert!(!features[1].has_geometry());

        assert_eq!(features[0].get("Female"), Some(&PropertyValue::Number(10.0)));
        assert_eq!(features[0].get("Note"), Some(&PropertyValue::Null));
        assert_eq!(features[1].get("Open"), Some(&PropertyValue::from("true")));

        let foreign = foreign.unwrap();
        assert_eq!(foreign["savedAt"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_written_collection_parses_back() {
        let (features, _) = parse_features(SAMPLE).unwrap();
        let text = write_features(&features, None).unwrap();
        let (reparsed, _) = parse_features(&text).unwrap();

        assert_eq!(reparsed.len(), 2);
        assert_eq!(reparsed[0].get("Zip"), Some(&PropertyValue::from("75001")));
        assert_eq!(reparsed[1].get("Zip"), Some(&PropertyValue::Number(75002.0)));
    }

    #[test]
    fn test_invalid_geometry_is_rejected() {
        let feature =
            Feature::with_geometry(serde_json::json!({"type": "Blob"}), PropertyBag::new());
        assert!(features_to_collection(&[feature], None).is_err());
    }

    #[test]
    fn test_malformed_text_is_a_decode_error() {
        let err = parse_features("{ not json").unwrap_err();
        assert!(matches!(err, ZonescopeError::Decode { .. }));
    }
}
