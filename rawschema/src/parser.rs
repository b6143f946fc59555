//! Turns [`RawDocument`]s into typed [`Schema`] trees.
//!
//! Each `const` fragment is decoded through the [`ConstValue`] entrypoint for
//! the document's format, which validates it, and is then materialized as a
//! [`Literal`]. Failures carry the keyword location. `enum` is handled
//! separately and the two keywords never look at each other.

use std::path::Path;

use rawschema_const::ConstValue;
use serde_json::Value;

use crate::document::{DocumentFormat, RawDocument, decode_document, load_file};
use crate::error::ParseError;
use crate::literal::Literal;
use crate::location::{File, Location, Pointer};
use crate::raw::{ConstSource, RawSchema};
use crate::schema::{Property, Schema, SchemaType};

/// Default limit on schema nesting.
/// Prevents stack overflow on deeply nested or maliciously crafted documents.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parser configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Settings {
    /// Document name used in locations and error messages.
    pub file: File,
    /// Maximum number of nested schema levels below the root.
    pub max_depth: usize,
}

impl Settings {
    #[must_use]
    pub fn new(file: File) -> Self {
        Self {
            file,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file: File::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Parser {
    settings: Settings,
}

impl Parser {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Parses a decoded document rooted at `settings.file`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying the keyword location on the first
    /// invalid keyword.
    pub fn parse(&self, doc: &RawDocument) -> Result<Schema, ParseError> {
        self.parse_root(doc, self.settings.file.clone())
    }

    /// Decodes and parses document bytes. The format follows the extension
    /// of `settings.file`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if decoding or parsing fails.
    pub fn parse_document(&self, data: &[u8]) -> Result<Schema, ParseError> {
        let file = &self.settings.file;
        let format = DocumentFormat::from_path(Path::new(file.name()));
        let doc = decode_document(file, data, format)?;
        self.parse(&doc)
    }

    /// Reads, decodes and parses a document from disk, naming it after `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if reading, decoding or parsing fails.
    pub fn parse_file(&self, path: &Path) -> Result<Schema, ParseError> {
        let (file, doc) = load_file(path)?;
        self.parse_root(&doc, file)
    }

    fn parse_root(&self, doc: &RawDocument, file: File) -> Result<Schema, ParseError> {
        let root = Location::new(file, Pointer::root());
        match doc {
            RawDocument::Json(raw) => self.parse_node(raw, root, 0),
            RawDocument::Yaml(raw) => self.parse_node(raw, root, 0),
        }
    }

    fn parse_node<C: ConstSource>(
        &self,
        raw: &RawSchema<C>,
        location: Location,
        depth: usize,
    ) -> Result<Schema, ParseError> {
        if depth > self.settings.max_depth {
            return Err(ParseError::TooDeep {
                location,
                max: self.settings.max_depth,
            });
        }

        let schema_type = raw
            .schema_type
            .as_deref()
            .map(|name| {
                SchemaType::from_name(name).ok_or_else(|| ParseError::UnknownType {
                    location: location.child("type"),
                    name: name.to_owned(),
                })
            })
            .transpose()?;

        let mut properties = Vec::with_capacity(raw.properties.len());
        for prop in &raw.properties {
            let schema = self.parse_node(
                &prop.schema,
                location.child("properties").child(&prop.name),
                depth + 1,
            )?;
            properties.push(Property {
                name: prop.name.clone(),
                schema,
                required: raw.required.contains(&prop.name),
            });
        }

        let items = match &raw.items {
            Some(items) => Some(Box::new(self.parse_node(
                items,
                location.child("items"),
                depth + 1,
            )?)),
            None => None,
        };

        let enum_values = match &raw.enum_values {
            Some(values) => parse_enum(values, &location.child("enum"))?,
            None => Vec::new(),
        };

        let const_value = raw
            .const_value
            .as_ref()
            .map(|value| parse_const(value, &location.child("const")))
            .transpose()?;

        Ok(Schema {
            schema_type,
            format: raw.format.clone(),
            description: raw.description.clone(),
            nullable: raw.nullable,
            properties,
            items,
            enum_values,
            const_value,
            location,
        })
    }
}

fn parse_const<C: ConstSource>(fragment: &C, location: &Location) -> Result<Literal, ParseError> {
    let const_error = |err| ParseError::Const {
        location: location.clone(),
        source: err,
    };
    let value: ConstValue = fragment.decode_const().map_err(const_error)?;
    let decoded = value.to_value().map_err(|e| const_error(e.into()))?;
    // Decoding always fills the container.
    let literal = decoded.as_ref().map_or(Literal::Null, Literal::from);
    tracing::debug!(pointer = %location.pointer, value = %literal, "parsed const");
    Ok(literal)
}

fn parse_enum(values: &[Value], location: &Location) -> Result<Vec<Literal>, ParseError> {
    if values.is_empty() {
        return Err(ParseError::EmptyEnum {
            location: location.clone(),
        });
    }
    for (index, value) in values.iter().enumerate() {
        if values[..index].contains(value) {
            return Err(ParseError::DuplicateEnum {
                location: location.index(index),
                index,
                value: Literal::from(value),
            });
        }
    }
    tracing::debug!(pointer = %location.pointer, count = values.len(), "parsed enum");
    Ok(values.iter().map(Literal::from).collect())
}
