//! Shape rules applied to every const value before it is stored.
//!
//! The rules look at the decoded value only, never at the declared schema
//! `type`, and run in order with the first match winning.

use serde_json::Value;
use thiserror::Error;

/// The one string literal that may not be used as a const.
///
/// This is an exact match. `"100.0"`, `"1000"` and the number `100` are all
/// accepted.
pub const RESERVED_STRING: &str = "100";

/// A const value with a disallowed shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConstViolation {
    /// `{}` was given as the const value.
    #[error("const cannot be an empty object")]
    EmptyObject,

    /// The reserved string literal was given as the const value.
    #[error("const cannot be the string {0:?}")]
    ReservedString(String),
}

/// Checks a decoded const value against the shape rules.
///
/// # Errors
///
/// Returns [`ConstViolation::EmptyObject`] for an object with no entries and
/// [`ConstViolation::ReservedString`] for the string [`RESERVED_STRING`].
pub fn validate_const(value: &Value) -> Result<(), ConstViolation> {
    match value {
        Value::Object(map) if map.is_empty() => Err(ConstViolation::EmptyObject),
        Value::String(s) if s == RESERVED_STRING => Err(ConstViolation::ReservedString(s.clone())),
        _ => Ok(()),
    }
}
