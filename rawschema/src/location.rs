//! Source locations attached to parsed schemas and parse errors.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Display name of a schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct File {
    name: Arc<str>,
}

impl File {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An RFC 6901 JSON pointer into a schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    tokens: Vec<String>,
}

impl Pointer {
    /// The pointer to the document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a pointer one object key deeper.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(key.to_owned());
        Self { tokens }
    }

    /// Returns a pointer one array index deeper.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(&index.to_string())
    }

    /// Number of reference tokens; the root has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for token in &self.tokens {
            f.write_str("/")?;
            for ch in token.chars() {
                match ch {
                    '~' => f.write_str("~0")?,
                    '/' => f.write_str("~1")?,
                    _ => fmt::Write::write_char(f, ch)?,
                }
            }
        }
        Ok(())
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A position within a named document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: File,
    pub pointer: Pointer,
}

impl Location {
    #[must_use]
    pub fn new(file: File, pointer: Pointer) -> Self {
        Self { file, pointer }
    }

    /// Returns the location of an object key below this one.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        Self::new(self.file.clone(), self.pointer.child(key))
    }

    /// Returns the location of an array element below this one.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self::new(self.file.clone(), self.pointer.index(index))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.pointer)
    }
}
