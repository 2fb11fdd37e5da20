// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Primitive operator whitelist.
//!
//! An operator is *primitive* when its name is on the whitelist; only
//! primitive operators get tensor operant bindings. The whitelist file is a
//! YAML list of names:
//!
//! ```yaml
//! - add
//! - subtract
//! - multiply
//! - divide
//! - exp
//! ```
//!
//! The operants generator currently restricts itself to the four arithmetic
//! operators in [`TEMPORARY_PRIMS`] regardless of what the file lists.

use crate::schema::{Result, SchemaError, is_blank_document, parse_list, read_document};
use camino::Utf8Path;

/// The arithmetic operators the operants generator is restricted to.
pub const TEMPORARY_PRIMS: [&str; 4] = ["add", "subtract", "multiply", "divide"];

/// An ordered set of primitive operator names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimList {
    names: Vec<String>,
}

impl PrimList {
    /// Create a whitelist from names. Duplicates are dropped, first
    /// occurrence wins.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    /// The fixed `{add, subtract, multiply, divide}` whitelist.
    #[must_use]
    pub fn temporary() -> Self {
        Self::new(TEMPORARY_PRIMS)
    }

    /// Parse a whitelist document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`](crate::schema::SchemaError::Parse) if
    /// the text is not a YAML list of strings.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        parse_list::<String>(text, origin).map(Self::new)
    }

    /// Read and parse a whitelist file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = read_document(path)?;
        Self::parse(&text, path.as_str())
    }

    /// Parse a whitelist document whose content may be discarded.
    ///
    /// Only YAML syntax errors are fatal. Returns `None` for valid YAML that
    /// is not a list of names.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Parse`] if the text is not valid YAML.
    pub fn parse_lenient(text: &str, origin: &str) -> Result<Option<Self>> {
        if is_blank_document(text) {
            return Ok(Some(Self::new(Vec::<String>::new())));
        }
        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|source| SchemaError::Parse {
                origin: origin.to_string(),
                source,
            })?;
        if value.is_null() {
            return Ok(Some(Self::new(Vec::<String>::new())));
        }
        Ok(serde_yaml::from_value::<Vec<String>>(value).ok().map(Self::new))
    }

    /// Read a whitelist file leniently; see [`PrimList::parse_lenient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn load_lenient(path: &Utf8Path) -> Result<Option<Self>> {
        let text = read_document(path)?;
        Self::parse_lenient(&text, path.as_str())
    }

    /// Whether `name` is whitelisted.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for PrimList {
    fn default() -> Self {
        Self::temporary()
    }
}
