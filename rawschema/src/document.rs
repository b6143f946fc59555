//! Reading schema documents from bytes or disk.
//!
//! JSON documents go through `serde_json` and keep each `const` as its raw
//! source text. YAML documents go through `serde_yaml` and keep each `const`
//! as a node, so explicit tags and non-finite floats reach the const
//! conversion rules instead of being flattened to strings.

use std::path::Path;

use serde_json::value::RawValue;

use crate::error::ParseError;
use crate::location::File;
use crate::raw::RawSchema;

/// Surface syntax of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Picks the format from the file extension.
    ///
    /// Anything that is not `.json` is read as YAML, which also accepts JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    /// Whether the path has an extension a schema document would use.
    #[must_use]
    pub fn is_schema_path(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("json" | "yaml" | "yml")
        )
    }
}

/// A decoded document whose `const` values have not been decoded yet.
#[derive(Debug, Clone)]
pub enum RawDocument {
    Json(RawSchema<Box<RawValue>>),
    Yaml(RawSchema),
}

impl RawDocument {
    #[must_use]
    pub fn format(&self) -> DocumentFormat {
        match self {
            Self::Json(_) => DocumentFormat::Json,
            Self::Yaml(_) => DocumentFormat::Yaml,
        }
    }
}

/// Decodes a schema document.
///
/// # Errors
///
/// Returns [`ParseError::Json`] or [`ParseError::Yaml`] if the document is
/// malformed. Both carry the file name and the position reported by the
/// decoder. `const` values are checked later, by the parser.
pub fn decode_document(
    file: &File,
    data: &[u8],
    format: DocumentFormat,
) -> Result<RawDocument, ParseError> {
    tracing::trace!(file = %file, ?format, bytes = data.len(), "decoding schema document");
    match format {
        DocumentFormat::Json => serde_json::from_slice(data)
            .map(RawDocument::Json)
            .map_err(|source| ParseError::Json {
                file: file.clone(),
                source,
            }),
        DocumentFormat::Yaml => serde_yaml::from_slice(data)
            .map(RawDocument::Yaml)
            .map_err(|source| ParseError::Yaml {
                file: file.clone(),
                source,
            }),
    }
}

/// Reads and decodes a schema document from disk.
///
/// The returned [`File`] is named after the path.
///
/// # Errors
///
/// Returns [`ParseError::Io`] if the file cannot be read, otherwise see
/// [`decode_document`].
pub fn load_file(path: &Path) -> Result<(File, RawDocument), ParseError> {
    let data = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = File::new(path.display().to_string());
    let doc = decode_document(&file, &data, DocumentFormat::from_path(path))?;
    Ok((file, doc))
}
