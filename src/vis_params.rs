//! Visualization parameters.
//!
//! A thin wrapper around a JSON object using the imagery service's own
//! vocabulary (`min`, `max`, `opacity`, `palette`, `bands`, ...). Keys this
//! crate does not interpret are kept and forwarded untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::colormaps::palette::parse_palette_entries;
use crate::error::{CartoeeError, Result};

/// Visualization parameters keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisParams(Map<String, Value>);

impl VisParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse parameters from a JSON object literal.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.to_string(), value.into())
    }

    /// Numeric value for `key`, or an error if it is present but not a number.
    pub fn scalar(&self, key: &str) -> Result<Option<f64>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| not_scalar(key)),
            Some(_) => Err(not_scalar(key)),
        }
    }

    pub fn min(&self) -> Result<Option<f64>> {
        self.scalar("min")
    }

    pub fn max(&self) -> Result<Option<f64>> {
        self.scalar("max")
    }

    pub fn opacity(&self) -> Result<Option<f64>> {
        self.scalar("opacity")
    }

    pub fn has_palette(&self) -> bool {
        self.0.contains_key("palette")
    }

    /// Palette entries as `#`-prefixed hex codes.
    ///
    /// Accepts either a comma-separated string or an array of strings.
    pub fn palette(&self) -> Result<Option<Vec<String>>> {
        let codes = match self.0.get("palette") {
            None => return Ok(None),
            Some(Value::String(s)) => parse_palette_entries(s.split(','))?,
            Some(Value::Array(items)) => {
                let entries = items
                    .iter()
                    .map(|item| {
                        item.as_str().ok_or_else(|| {
                            CartoeeError::invalid("palette", "palette entries must be strings")
                        })
                    })
                    .collect::<Result<Vec<&str>>>()?;
                parse_palette_entries(entries)?
            }
            Some(other) => {
                return Err(CartoeeError::invalid(
                    "palette",
                    format!("expected a string or a list of strings, got {}", other),
                ))
            }
        };

        if codes.is_empty() {
            return Err(CartoeeError::invalid("palette", "palette has no colors"));
        }
        Ok(Some(codes))
    }

    /// Band label, with multiple bands joined by commas.
    pub fn bands(&self) -> Option<String> {
        self.0.get("bands").map(wire_value)
    }

    /// Flatten into `key=value` pairs as the imagery service expects them.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), wire_value(v)))
            .collect()
    }
}

impl From<Map<String, Value>> for VisParams {
    fn from(map: Map<String, Value>) -> Self {
        VisParams(map)
    }
}

fn not_scalar(key: &str) -> CartoeeError {
    CartoeeError::invalid(key, format!("provided {} value not of scalar type", key))
}

/// Render a JSON value the way the imagery service reads query parameters.
pub(crate) fn wire_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(wire_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_fields() {
        let params = VisParams::new().with("min", 0).with("max", 3000.5);
        assert_eq!(params.min().unwrap(), Some(0.0));
        assert_eq!(params.max().unwrap(), Some(3000.5));
        assert_eq!(params.opacity().unwrap(), None);

        let params = VisParams::new().with("min", "0");
        assert!(params.min().is_err());
        let params = VisParams::new().with("opacity", json!([0.5]));
        assert!(params.opacity().is_err());
    }

    #[test]
    fn test_palette_forms() {
        let params = VisParams::new().with("palette", "ff0000,00ff00");
        assert_eq!(
            params.palette().unwrap().unwrap(),
            vec!["#ff0000", "#00ff00"]
        );

        let params = VisParams::new().with("palette", json!(["#0000ff", "ffffff"]));
        assert_eq!(
            params.palette().unwrap().unwrap(),
            vec!["#0000ff", "#ffffff"]
        );

        assert_eq!(VisParams::new().palette().unwrap(), None);
        assert!(VisParams::new().with("palette", 5).palette().is_err());
        assert!(VisParams::new().with("palette", "").palette().is_err());
    }

    #[test]
    fn test_bands_label() {
        let params = VisParams::new().with("bands", "elevation");
        assert_eq!(params.bands().as_deref(), Some("elevation"));
        let params = VisParams::new().with("bands", json!(["B4", "B3", "B2"]));
        assert_eq!(params.bands().as_deref(), Some("B4,B3,B2"));
    }

    #[test]
    fn test_query_pairs_preserve_unknown_keys() {
        let params = VisParams::from_json(r#"{"min": 0, "max": 1, "gamma": 1.4}"#).unwrap();
        let pairs = params.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("min".to_string(), "0".to_string()),
                ("max".to_string(), "1".to_string()),
                ("gamma".to_string(), "1.4".to_string()),
            ]
        );
    }
}
