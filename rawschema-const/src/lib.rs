//! Lossless storage and validation of the JSON Schema `const` keyword.
//!
//! A [`ConstValue`] holds exactly one JSON value as canonical JSON bytes,
//! whichever surface syntax it was read from. JSON input is stored verbatim;
//! YAML nodes are converted to JSON first. Both paths run [`validate_const`]
//! on the decoded value before anything is committed.
//!
//! ```
//! use rawschema_const::ConstValue;
//!
//! let value = ConstValue::from_json(br#"{"status": "active"}"#).unwrap();
//! assert_eq!(value.encode_json(), br#"{"status": "active"}"#);
//!
//! let err = ConstValue::from_json(b"{}").unwrap_err();
//! assert_eq!(err.to_string(), "const cannot be an empty object");
//! ```

mod error;
mod validate;
mod value;
pub mod yaml;

pub use error::{ConstError, ConvertError};
pub use validate::{ConstViolation, RESERVED_STRING, validate_const};
pub use value::ConstValue;
