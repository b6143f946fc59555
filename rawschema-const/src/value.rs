use std::any::type_name;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{self, Serialize, Serializer};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::error::ConstError;
use crate::validate::validate_const;
use crate::yaml::{json_to_yaml, short_tag, yaml_to_json};

const JSON_NULL: &[u8] = b"null";

/// The value of a schema's `const` keyword, held as canonical JSON bytes.
///
/// A default `ConstValue` holds nothing. Decoding either format validates
/// the value first and only then replaces the stored bytes, so a failed
/// decode never changes what the container held before.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ConstValue {
    raw: Option<Vec<u8>>,
}

impl ConstValue {
    /// Decodes JSON bytes into a new container.
    ///
    /// # Errors
    ///
    /// See [`ConstValue::decode_json`].
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConstError> {
        let mut value = Self::default();
        value.decode_json(bytes)?;
        Ok(value)
    }

    /// Decodes a YAML node into a new container.
    ///
    /// # Errors
    ///
    /// See [`ConstValue::decode_yaml`].
    pub fn from_yaml(node: &YamlValue) -> Result<Self, ConstError> {
        let mut value = Self::default();
        value.decode_yaml(node)?;
        Ok(value)
    }

    /// Whether a value has been decoded into this container.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.raw.is_some()
    }

    /// The canonical JSON bytes, if a value is held.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    /// Decodes the canonical bytes into a generic JSON value.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the stored bytes do not parse, which
    /// only happens if the canonical-form invariant was broken.
    pub fn to_value(&self) -> Result<Option<JsonValue>, serde_json::Error> {
        self.raw
            .as_deref()
            .map(serde_json::from_slice::<JsonValue>)
            .transpose()
    }

    /// Returns the canonical bytes. An empty container encodes as `null`.
    #[must_use]
    pub fn encode_json(&self) -> &[u8] {
        self.raw.as_deref().unwrap_or(JSON_NULL)
    }

    /// Validates `bytes` and stores them verbatim.
    ///
    /// The bytes are parsed only to run the const rules; the stored form is
    /// exactly what was passed in.
    ///
    /// # Errors
    ///
    /// Returns [`ConstError::Syntax`] with the parser error unchanged if
    /// `bytes` is not JSON, or [`ConstError::Invalid`] if a const rule
    /// rejects the value.
    pub fn decode_json(&mut self, bytes: &[u8]) -> Result<(), ConstError> {
        let value: JsonValue = serde_json::from_slice(bytes)?;
        validate_const(&value)?;
        self.raw = Some(bytes.to_vec());
        Ok(())
    }

    /// Converts the stored value into a YAML node tree.
    ///
    /// An empty container encodes as a YAML null.
    ///
    /// # Errors
    ///
    /// Returns [`ConstError::Syntax`] if the stored bytes do not parse.
    pub fn encode_yaml(&self) -> Result<YamlValue, ConstError> {
        Ok(self
            .to_value()?
            .as_ref()
            .map_or(YamlValue::Null, json_to_yaml))
    }

    /// Converts a YAML node into canonical JSON bytes, validates, and stores.
    ///
    /// # Errors
    ///
    /// Returns [`ConstError::Convert`] if the node has no JSON equivalent and
    /// [`ConstError::Invalid`] if a const rule rejects the value.
    pub fn decode_yaml(&mut self, node: &YamlValue) -> Result<(), ConstError> {
        let value = yaml_to_json(node).map_err(|source| ConstError::Convert {
            tag: short_tag(node),
            target: type_name::<Self>(),
            source,
        })?;
        validate_const(&value)?;
        self.raw = Some(serde_json::to_vec(&value)?);
        Ok(())
    }
}

impl fmt::Debug for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f
                .debug_tuple("ConstValue")
                .field(&String::from_utf8_lossy(raw))
                .finish(),
            None => f.write_str("ConstValue(<unset>)"),
        }
    }
}

impl Serialize for ConstValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_value().map_err(<S::Error as ser::Error>::custom)? {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_unit(),
        }
    }
}

/// Reads the value as a YAML node so JSON and YAML documents take the same
/// path into [`ConstValue::decode_yaml`].
impl<'de> Deserialize<'de> for ConstValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = YamlValue::deserialize(deserializer)?;
        Self::from_yaml(&node).map_err(<D::Error as de::Error>::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::validate::ConstViolation;
    use serde_json::json;

    fn yaml(src: &str) -> YamlValue {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn test_default_is_unset() {
        let value = ConstValue::default();
        assert!(!value.is_set());
        assert_eq!(value.as_bytes(), None);
        assert_eq!(value.encode_json(), b"null");
        assert_eq!(value.encode_yaml().unwrap(), YamlValue::Null);
        assert_eq!(value.to_value().unwrap(), None);
    }

    #[test]
    fn test_json_bytes_stored_verbatim() {
        let input = b"{ \"b\" : 1,\n  \"a\": [true, null] }";
        let value = ConstValue::from_json(input).unwrap();
        assert_eq!(value.encode_json(), input);
    }

    #[test]
    fn test_json_null_is_set() {
        let value = ConstValue::from_json(b"null").unwrap();
        assert!(value.is_set());
        assert_eq!(value.to_value().unwrap(), Some(JsonValue::Null));
    }

    #[test]
    fn test_json_empty_object_rejected() {
        let err = ConstValue::from_json(b"{ }").unwrap_err();
        assert!(matches!(err, ConstError::Invalid(ConstViolation::EmptyObject)));
        assert!(err.to_string().contains("empty object"));
    }

    #[test]
    fn test_json_reserved_string_rejected() {
        let err = ConstValue::from_json(br#""100""#).unwrap_err();
        assert!(matches!(err, ConstError::Invalid(ConstViolation::ReservedString(_))));
        assert!(err.to_string().contains(r#""100""#));
    }

    #[test]
    fn test_json_near_misses_accepted() {
        let inputs: [&[u8]; 3] = [br#""100.0""#, br#""1000""#, b"100"];
        for input in inputs {
            let value = ConstValue::from_json(input).unwrap();
            assert_eq!(value.encode_json(), input);
        }
    }

    #[test]
    fn test_json_syntax_error_propagates_unchanged() {
        let err = ConstValue::from_json(b"{\"a\":").unwrap_err();
        let ConstError::Syntax(inner) = &err else {
            panic!("expected syntax error, got: {err}");
        };
        assert!(inner.is_eof());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn test_failed_decode_keeps_previous_value() {
        let mut value = ConstValue::from_json(br#""active""#).unwrap();

        assert!(value.decode_json(b"{}").is_err());
        assert!(value.decode_json(b"not json").is_err());
        assert!(value.decode_yaml(&yaml("!tag x")).is_err());
        assert!(value.decode_yaml(&yaml("'100'")).is_err());

        assert_eq!(value.encode_json(), br#""active""#);
    }

    #[test]
    fn test_failed_decode_keeps_unset() {
        let mut value = ConstValue::default();
        assert!(value.decode_yaml(&yaml("{}")).is_err());
        assert!(!value.is_set());
    }

    #[test]
    fn test_yaml_decode_produces_compact_json() {
        let value = ConstValue::from_yaml(&yaml("status: active\ncount: 3\nratio: 0.5\n")).unwrap();
        assert_eq!(
            value.encode_json(),
            br#"{"status":"active","count":3,"ratio":0.5}"#
        );
    }

    #[test]
    fn test_yaml_empty_object_rejected() {
        let err = ConstValue::from_yaml(&yaml("{}")).unwrap_err();
        assert_eq!(err.to_string(), "const cannot be an empty object");
    }

    #[test]
    fn test_yaml_quoted_reserved_string_rejected() {
        let err = ConstValue::from_yaml(&yaml("\"100\"")).unwrap_err();
        assert!(matches!(err, ConstError::Invalid(ConstViolation::ReservedString(_))));

        let value = ConstValue::from_yaml(&yaml("100")).unwrap();
        assert_eq!(value.encode_json(), b"100");
    }

    #[test]
    fn test_yaml_conversion_error_names_tag_and_target() {
        let err = ConstValue::from_yaml(&yaml("key: !custom value\n")).unwrap_err();
        let ConstError::Convert { tag, target, source } = &err else {
            panic!("expected conversion error, got: {err}");
        };
        assert_eq!(tag, "!!map");
        assert!(target.ends_with("ConstValue"), "got: {target}");
        assert_eq!(
            source,
            &ConvertError::Tagged {
                tag: "!custom".to_owned()
            }
        );
        assert!(err.to_string().starts_with("cannot unmarshal !!map into "));
    }

    #[test]
    fn test_yaml_colliding_keys_keep_previous_value() {
        let mut value = ConstValue::from_json(b"true").unwrap();
        let err = value.decode_yaml(&yaml("{1: a, '1': b}")).unwrap_err();
        assert!(matches!(
            err,
            ConstError::Convert {
                source: ConvertError::DuplicateKey { .. },
                ..
            }
        ));
        assert_eq!(value.encode_json(), b"true");
    }

    #[test]
    fn test_yaml_round_trip() {
        for value in [
            json!("active"),
            json!(""),
            json!(42),
            json!(-9_223_372_036_854_775_808_i64),
            json!(u64::MAX),
            json!(0.1),
            json!(1e300),
            json!(true),
            json!(null),
            json!([1, "two", [3.5], {"four": 4}]),
            json!({"z": {"y": [null, false]}, "a": "b"}),
        ] {
            let bytes = serde_json::to_vec(&value).unwrap();
            let original = ConstValue::from_json(&bytes).unwrap();

            let node = original.encode_yaml().unwrap();
            let decoded = ConstValue::from_yaml(&node).unwrap();

            assert_eq!(decoded.to_value().unwrap(), Some(value.clone()), "{value}");
            assert_eq!(decoded.encode_yaml().unwrap(), node, "{value}");
        }
    }

    #[test]
    fn test_json_round_trip() {
        let inputs: [&[u8]; 5] = [b"\"x\"", b"3.25", b"[]", br#"{"k":[1,2]}"#, b"false"];
        for input in inputs {
            let original = ConstValue::from_json(input).unwrap();
            let decoded = ConstValue::from_json(original.encode_json()).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn test_deserialize_from_json_document() {
        let value: ConstValue = serde_json::from_str(r#"{"a": 1, "b": [true]}"#).unwrap();
        assert_eq!(value.encode_json(), br#"{"a":1,"b":[true]}"#);

        let err = serde_json::from_str::<ConstValue>("{}").unwrap_err();
        assert!(err.to_string().contains("const cannot be an empty object"));
    }

    #[test]
    fn test_deserialize_from_yaml_document() {
        let value: ConstValue = serde_yaml::from_str("- 1\n- two\n").unwrap();
        assert_eq!(value.encode_json(), br#"[1,"two"]"#);

        let err = serde_yaml::from_str::<ConstValue>("'100'").unwrap_err();
        assert!(err.to_string().contains(r#"const cannot be the string "100""#));
    }

    #[test]
    fn test_serialize_emits_value() {
        let value = ConstValue::from_json(br#"{"b": 2, "a": 1}"#).unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"b":2,"a":1}"#);
        assert_eq!(serde_json::to_string(&ConstValue::default()).unwrap(), "null");
    }

    #[test]
    fn test_debug_shows_canonical_text() {
        let value = ConstValue::from_json(b"[1]").unwrap();
        assert_eq!(format!("{value:?}"), "ConstValue(\"[1]\")");
        assert_eq!(format!("{:?}", ConstValue::default()), "ConstValue(<unset>)");
    }
}
