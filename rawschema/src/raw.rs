//! Untyped schema documents as read from JSON or YAML.
//!
//! `RawSchema` mirrors the document structure one to one and interprets no
//! keyword. The `const` value is kept undecoded, in the syntax it was written
//! in, so the parser can hand it to the matching [`ConstValue`] entrypoint.

use std::fmt;
use std::marker::PhantomData;

use rawschema_const::{ConstError, ConstValue};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;
use serde_yaml::Value as YamlValue;

/// A `const` fragment as captured by a document decoder.
pub trait ConstSource {
    /// Decodes and validates the fragment.
    ///
    /// # Errors
    ///
    /// Returns the [`ConstError`] of the format's `ConstValue` entrypoint.
    fn decode_const(&self) -> Result<ConstValue, ConstError>;
}

/// JSON documents keep the exact source text of the value.
impl ConstSource for Box<RawValue> {
    fn decode_const(&self) -> Result<ConstValue, ConstError> {
        ConstValue::from_json(self.get().as_bytes())
    }
}

/// YAML documents keep the node, tags included.
impl ConstSource for YamlValue {
    fn decode_const(&self) -> Result<ConstValue, ConstError> {
        ConstValue::from_yaml(self)
    }
}

/// A schema node before parsing.
///
/// `C` is the undecoded `const` fragment: `Box<RawValue>` for JSON documents
/// and `serde_yaml::Value` for YAML documents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(bound(
    serialize = "C: Serialize",
    deserialize = "C: Deserialize<'de>"
))]
pub struct RawSchema<C = YamlValue> {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,

    #[serde(default, skip_serializing_if = "RawProperties::is_empty")]
    pub properties: RawProperties<C>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<RawSchema<C>>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// `Some` whenever the document has a `const` key, including `const: null`.
    #[serde(
        rename = "const",
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub const_value: Option<C>,
}

/// Wraps every present value in `Some`; `#[serde(default)]` covers absence.
///
/// A plain `Option` would turn an explicit `null` into `None`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A named entry of `properties`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProperty<C = YamlValue> {
    pub name: String,
    pub schema: RawSchema<C>,
}

/// The `properties` keyword, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProperties<C = YamlValue>(Vec<RawProperty<C>>);

impl<C> Default for RawProperties<C> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<C> RawProperties<C> {
    #[must_use]
    pub fn new(properties: Vec<RawProperty<C>>) -> Self {
        Self(properties)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawProperty<C>> {
        self.0.iter()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RawSchema<C>> {
        self.0.iter().find(|p| p.name == name).map(|p| &p.schema)
    }
}

impl<'a, C> IntoIterator for &'a RawProperties<C> {
    type Item = &'a RawProperty<C>;
    type IntoIter = std::slice::Iter<'a, RawProperty<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<C: Serialize> Serialize for RawProperties<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for prop in &self.0 {
            map.serialize_entry(&prop.name, &prop.schema)?;
        }
        map.end()
    }
}

impl<'de, C: Deserialize<'de>> Deserialize<'de> for RawProperties<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor<C>(PhantomData<C>);

        impl<'de, C: Deserialize<'de>> Visitor<'de> for PropertiesVisitor<C> {
            type Value = RawProperties<C>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of property names to schemas")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut props: Vec<RawProperty<C>> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, schema)) = map.next_entry::<String, RawSchema<C>>()? {
                    if props.iter().any(|p| p.name == name) {
                        return Err(de::Error::custom(format!("duplicate property {name:?}")));
                    }
                    props.push(RawProperty { name, schema });
                }
                Ok(RawProperties(props))
            }
        }

        deserializer.deserialize_map(PropertiesVisitor(PhantomData))
    }
}
