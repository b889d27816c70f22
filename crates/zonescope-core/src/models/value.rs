use serde::{Deserialize, Serialize};
use std::fmt;

/// Loosely-typed scalar stored in a feature's property bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Number(f64),
    Text(String),
}

impl PropertyValue {
    /// Parse this value as a finite number.
    ///
    /// Text is trimmed before parsing; `Null` and unparsable text yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) if n.is_finite() => Some(*n),
            PropertyValue::Number(_) => None,
            PropertyValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            PropertyValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Whether the textual form of this value is empty
    pub fn is_blank(&self) -> bool {
        match self {
            PropertyValue::Null => true,
            PropertyValue::Text(s) => s.trim().is_empty(),
            PropertyValue::Number(_) => false,
        }
    }

    /// Convert a JSON scalar into a property value.
    ///
    /// Booleans become text; arrays and objects are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropertyValue::Null,
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(PropertyValue::Number)
                .unwrap_or(PropertyValue::Null),
            serde_json::Value::String(s) => PropertyValue::Text(s.clone()),
            serde_json::Value::Bool(b) => PropertyValue::Text(b.to_string()),
            other => PropertyValue::Text(other.to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PropertyValue::Null => serde_json::Value::Null,
            PropertyValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            PropertyValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => Ok(()),
            // 75001.0 renders as "75001" so ZIP-like numbers read naturally
            PropertyValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_number() {
        assert_eq!(PropertyValue::Number(4.5).as_number(), Some(4.5));
        assert_eq!(PropertyValue::from(" 12 ").as_number(), Some(12.0));
        assert_eq!(PropertyValue::from("n/a").as_number(), None);
        assert_eq!(PropertyValue::Null.as_number(), None);
        assert_eq!(PropertyValue::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_display_integral_numbers() {
        assert_eq!(PropertyValue::Number(75001.0).to_string(), "75001");
        assert_eq!(PropertyValue::Number(2.25).to_string(), "2.25");
        assert_eq!(PropertyValue::Null.to_string(), "");
    }

    #[test]
    fn test_json_conversion() {
        let value = serde_json::json!({"a": 1});
        assert_eq!(
            PropertyValue::from_json(&serde_json::json!(true)),
            PropertyValue::Text("true".to_string())
        );
        assert_eq!(
            PropertyValue::from_json(&value),
            PropertyValue::Text("{\"a\":1}".to_string())
        );
        assert_eq!(PropertyValue::Number(3.0).to_json(), serde_json::json!(3.0));
    }

    #[test]
    fn test_untagged_serde() {
        let values: Vec<PropertyValue> = serde_json::from_str(r#"[null, 3, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                PropertyValue::Null,
                PropertyValue::Number(3.0),
                PropertyValue::Text("x".to_string())
            ]
        );
    }
}
