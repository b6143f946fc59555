//! Error types for const decoding.

use thiserror::Error;

use crate::validate::ConstViolation;

/// Errors from decoding a const value in either format.
#[derive(Debug, Error)]
pub enum ConstError {
    /// The YAML node has no JSON equivalent.
    #[error("cannot unmarshal {tag} into {target}: {source}")]
    Convert {
        /// Short tag of the offending node (`!!map`, `!custom`, ...).
        tag: String,
        /// Type name of the container being decoded into.
        target: &'static str,
        /// The underlying conversion failure.
        #[source]
        source: ConvertError,
    },

    /// The decoded value is a rejected const shape.
    #[error(transparent)]
    Invalid(#[from] ConstViolation),

    /// The input bytes are not JSON at all.
    #[error(transparent)]
    Syntax(#[from] serde_json::Error),
}

/// Failures converting a YAML node tree into a JSON value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConvertError {
    /// Explicitly tagged nodes carry application semantics JSON cannot express.
    #[error("tagged value {tag} has no JSON equivalent")]
    Tagged {
        /// The tag as written in the document.
        tag: String,
    },

    /// Mapping keys must be scalars that can be written as a JSON string.
    #[error("mapping key {tag} cannot be used as a JSON object key")]
    NonStringKey {
        /// Short tag of the key node.
        tag: String,
    },

    /// Two mapping keys become the same JSON key, as `1` and `'1'` do.
    #[error("duplicate key {key:?} after converting mapping keys to strings")]
    DuplicateKey {
        /// The key as written in the JSON object.
        key: String,
    },

    /// `.inf`, `-.inf` and `.nan` are valid YAML floats but not JSON numbers.
    #[error("number {0} is not representable in JSON")]
    NonFinite(f64),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_error_names_tag_and_target() {
        let err = ConstError::Convert {
            tag: "!custom".to_owned(),
            target: "ConstValue",
            source: ConvertError::Tagged {
                tag: "!custom".to_owned(),
            },
        };

        let msg = err.to_string();
        assert!(msg.starts_with("cannot unmarshal !custom into ConstValue"), "got: {msg}");
        assert!(msg.contains("has no JSON equivalent"), "got: {msg}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_violation_is_transparent() {
        let err = ConstError::from(ConstViolation::EmptyObject);
        assert_eq!(err.to_string(), "const cannot be an empty object");
    }

    #[test]
    fn test_syntax_error_is_unchanged() {
        let Err(parse_err) = serde_json::from_slice::<serde_json::Value>(b"{") else {
            panic!("expected a syntax error");
        };
        let expected = parse_err.to_string();

        let err = ConstError::from(parse_err);
        assert_eq!(err.to_string(), expected);
    }
}
