//! Conversion between the YAML node model and JSON values.
//!
//! YAML is read into a [`serde_yaml::Value`] tree and converted here before
//! any const rule runs, so JSON and YAML documents share one canonical form.
//! Mapping order is kept in both directions, which makes re-encoding the same
//! input produce the same node sequence every time.

use serde_json::Value as JsonValue;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::ConvertError;

/// Converts a YAML node tree into a JSON value.
///
/// # Errors
///
/// Returns a [`ConvertError`] when the tree contains an explicitly tagged
/// node or a non-finite float, or when a mapping has a key that cannot be
/// written as a JSON string or that collides with another key once written.
pub fn yaml_to_json(node: &YamlValue) -> Result<JsonValue, ConvertError> {
    match node {
        YamlValue::Null => Ok(JsonValue::Null),
        YamlValue::Bool(b) => Ok(JsonValue::Bool(*b)),
        YamlValue::Number(n) => json_number(n).map(JsonValue::Number),
        YamlValue::String(s) => Ok(JsonValue::String(s.clone())),
        YamlValue::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(JsonValue::Array),
        YamlValue::Mapping(mapping) => {
            let mut obj = serde_json::Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                let key = json_key(key)?;
                if obj.contains_key(&key) {
                    return Err(ConvertError::DuplicateKey { key });
                }
                obj.insert(key, yaml_to_json(value)?);
            }
            Ok(JsonValue::Object(obj))
        }
        YamlValue::Tagged(tagged) => Err(ConvertError::Tagged {
            tag: tagged.tag.to_string(),
        }),
    }
}

/// Converts a JSON value into a YAML node tree.
#[must_use]
pub fn json_to_yaml(value: &JsonValue) -> YamlValue {
    match value {
        JsonValue::Null => YamlValue::Null,
        JsonValue::Bool(b) => YamlValue::Bool(*b),
        JsonValue::Number(n) => YamlValue::Number(yaml_number(n)),
        JsonValue::String(s) => YamlValue::String(s.clone()),
        JsonValue::Array(items) => YamlValue::Sequence(items.iter().map(json_to_yaml).collect()),
        JsonValue::Object(obj) => {
            let mut mapping = Mapping::with_capacity(obj.len());
            for (key, value) in obj {
                mapping.insert(YamlValue::String(key.clone()), json_to_yaml(value));
            }
            YamlValue::Mapping(mapping)
        }
    }
}

/// Returns the YAML short tag describing a node (`!!str`, `!!map`, ...).
///
/// Explicitly tagged nodes report their own tag.
#[must_use]
pub fn short_tag(node: &YamlValue) -> String {
    let tag = match node {
        YamlValue::Null => "!!null",
        YamlValue::Bool(_) => "!!bool",
        YamlValue::Number(n) if n.is_f64() => "!!float",
        YamlValue::Number(_) => "!!int",
        YamlValue::String(_) => "!!str",
        YamlValue::Sequence(_) => "!!seq",
        YamlValue::Mapping(_) => "!!map",
        YamlValue::Tagged(tagged) => return tagged.tag.to_string(),
    };
    tag.to_owned()
}

fn json_number(n: &serde_yaml::Number) -> Result<serde_json::Number, ConvertError> {
    if let Some(i) = n.as_i64() {
        return Ok(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Ok(u.into());
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    serde_json::Number::from_f64(f).ok_or(ConvertError::NonFinite(f))
}

fn yaml_number(n: &serde_json::Number) -> serde_yaml::Number {
    if let Some(i) = n.as_i64() {
        i.into()
    } else if let Some(u) = n.as_u64() {
        u.into()
    } else {
        // Always Some without the arbitrary_precision feature.
        n.as_f64().unwrap_or_default().into()
    }
}

fn json_key(key: &YamlValue) -> Result<String, ConvertError> {
    match key {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        other => Err(ConvertError::NonStringKey {
            tag: short_tag(other),
        }),
    }
}
