//! Error types for schema loading and parsing.

use std::path::PathBuf;

use rawschema_const::ConstError;
use thiserror::Error;

use crate::literal::Literal;
use crate::location::{File, Location};

/// Errors from decoding or parsing a schema document.
///
/// Every variant carries either the document name or a full [`Location`],
/// so the message alone is enough to point at the offending keyword.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The JSON document could not be decoded. Includes line and column.
    #[error("{file}: {source}")]
    Json {
        file: File,
        #[source]
        source: serde_json::Error,
    },

    /// The YAML document could not be decoded. Includes line and column.
    #[error("{file}: {source}")]
    Yaml {
        file: File,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document could not be read.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `const` value could not be materialized.
    #[error("{location}: {source}")]
    Const {
        location: Location,
        #[source]
        source: ConstError,
    },

    /// `type` names something other than the seven JSON Schema types.
    #[error("{location}: unknown type {name:?}")]
    UnknownType { location: Location, name: String },

    /// `enum` is present but lists no values.
    #[error("{location}: enum must contain at least one value")]
    EmptyEnum { location: Location },

    /// `enum` lists the same value twice.
    #[error("{location}: duplicate enum value {value} at index {index}")]
    DuplicateEnum {
        location: Location,
        index: usize,
        value: Literal,
    },

    /// Schemas are nested deeper than the configured limit.
    #[error("{location}: schema nesting exceeds maximum depth of {max}")]
    TooDeep { location: Location, max: usize },
}

impl ParseError {
    /// The keyword location, for errors raised after decoding.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Const { location, .. }
            | Self::UnknownType { location, .. }
            | Self::EmptyEnum { location }
            | Self::DuplicateEnum { location, .. }
            | Self::TooDeep { location, .. } => Some(location),
            Self::Json { .. } | Self::Yaml { .. } | Self::Io { .. } => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::location::Pointer;
    use rawschema_const::ConstViolation;

    #[test]
    fn test_const_error_names_location_and_rule() {
        let location = Location::new(File::new("api.yaml"), Pointer::root()).child("const");
        let err = ParseError::Const {
            location,
            source: ConstError::Invalid(ConstViolation::EmptyObject),
        };
        assert_eq!(
            err.to_string(),
            "api.yaml#/const: const cannot be an empty object"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.location().unwrap().pointer.to_string(), "#/const");
    }

    #[test]
    fn test_io_error_shows_path() {
        let err = ParseError::Io {
            path: PathBuf::from("missing/schema.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "missing/schema.json: not found");
        assert!(err.location().is_none());
    }
}
