//! JSON Schema documents with lossless `const` handling.
//!
//! Documents are decoded from JSON or YAML into a [`RawDocument`], then turned
//! into a typed [`Schema`] tree by [`Parser`]. Each `const` value is decoded
//! and validated by [`rawschema_const`] through the entrypoint matching the
//! document's format.

pub mod document;
pub mod error;
pub mod literal;
pub mod location;
pub mod parser;
pub mod raw;
pub mod schema;


// Re-export commonly used types
pub use document::{DocumentFormat, RawDocument, decode_document, load_file};
pub use error::ParseError;
pub use literal::Literal;
pub use location::{File, Location, Pointer};
pub use parser::{DEFAULT_MAX_DEPTH, Parser, Settings};
pub use rawschema_const::{ConstError, ConstValue, ConstViolation};
pub use raw::{ConstSource, RawProperties, RawProperty, RawSchema};
pub use schema::{Property, Schema, SchemaType};
