// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Operator schema records.
//!
//! The generator consumes the *parsed* operator YAML: a list of mappings,
//! one per operator, each carrying structured `inputs`, `attrs` and
//! `outputs` lists. Only the fields the generators read are modelled;
//! everything else in a record is ignored.
//!
//! ```yaml
//! - name: add
//!   inputs:
//!   - {typename: Tensor, name: x, optional: false}
//!   - {typename: Tensor, name: y, optional: false}
//!   attrs: []
//!   outputs:
//!   - {typename: Tensor, name: out, optional: false, intermediate: false}
//!   inplace: null
//! ```
//!
//! Loading validates record *shape* only. Type names are checked when a
//! record is turned into a [`Signature`], which only happens for operators
//! that are actually emitted.

pub mod signature;
pub mod types;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use thiserror::Error;
use tracing::debug;

pub use signature::Signature;

/// Errors raised while loading or interpreting schema documents.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An input document could not be read.
    #[error("failed to read '{path}': {source}")]
    Read {
        /// The file that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An input document is not valid YAML or has the wrong shape.
    #[error("failed to parse '{origin}': {source}")]
    Parse {
        /// File path or other description of where the text came from.
        origin: String,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A record lacks a field the signature derivation needs.
    #[error("operator '{op}' is missing required field '{field}'")]
    MissingField {
        /// Operator name.
        op: String,
        /// Name of the absent field.
        field: &'static str,
    },

    /// A type name with no C++ mapping.
    #[error("operator '{op}': unknown {kind} type '{typename}' for '{name}'")]
    UnknownType {
        /// Operator name.
        op: String,
        /// `input`, `attribute` or `output`.
        kind: &'static str,
        /// Parameter or output name.
        name: String,
        /// The unrecognized type name.
        typename: String,
    },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// One operator entry from a parsed operator YAML document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpRecord {
    /// Operator name, e.g. `add` or `relu_`.
    pub name: String,
    /// Tensor-valued parameters, in declaration order.
    #[serde(default)]
    pub inputs: Option<Vec<InputSpec>>,
    /// Scalar or array-valued parameters, in declaration order.
    #[serde(default)]
    pub attrs: Option<Vec<AttrSpec>>,
    /// Results, in declaration order.
    #[serde(default)]
    pub outputs: Option<Vec<OutputSpec>>,
    /// Inplace aliasing: output name → input name.
    #[serde(default)]
    pub inplace: Option<BTreeMap<String, String>>,
}

/// A tensor input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputSpec {
    pub name: String,
    pub typename: String,
    #[serde(default)]
    pub optional: bool,
}

/// A non-tensor attribute.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttrSpec {
    pub name: String,
    pub typename: String,
    #[serde(default)]
    pub default_value: Option<DefaultValue>,
    #[serde(default)]
    pub optional: bool,
}

/// An operator output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputSpec {
    pub name: String,
    pub typename: String,
    /// Intermediate outputs are internal and never part of the signature.
    #[serde(default)]
    pub intermediate: bool,
    /// Size expression for `Tensor[]` outputs.
    #[serde(default)]
    pub size: Option<String>,
}

/// An attribute default, spliced verbatim into C++ declarations.
///
/// Parsed operator YAML normally quotes defaults (`default_value: '-1'`),
/// but bare YAML scalars are accepted too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(v) => write!(f, "{v}"),
            DefaultValue::Int(v) => write!(f, "{v}"),
            DefaultValue::Float(v) => write!(f, "{v:?}"),
            DefaultValue::Text(v) => f.write_str(v),
        }
    }
}

/// Returns true if `text` holds no YAML content (only blank lines,
/// comments, or document markers).
pub(crate) fn is_blank_document(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Parse a YAML document holding a list of `T`.
///
/// An empty or `null` document yields an empty list. Anything else that is
/// not a list of well-formed records is an error.
pub(crate) fn parse_list<T: DeserializeOwned>(text: &str, origin: &str) -> Result<Vec<T>> {
    if is_blank_document(text) {
        return Ok(Vec::new());
    }
    let items: Option<Vec<T>> =
        serde_yaml::from_str(text).map_err(|source| SchemaError::Parse {
            origin: origin.to_string(),
            source,
        })?;
    Ok(items.unwrap_or_default())
}

/// Read a file into a string, attaching the path to any error.
pub(crate) fn read_document(path: &Utf8Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse one operator YAML document.
pub fn parse_op_document(text: &str, origin: &str) -> Result<Vec<OpRecord>> {
    parse_list(text, origin)
}

/// Load and concatenate operator YAML documents.
///
/// Records keep file order and in-file order. Nothing is merged or
/// deduplicated: an operator listed in two documents appears twice.
pub fn load_op_documents<P: AsRef<Utf8Path>>(paths: &[P]) -> Result<Vec<OpRecord>> {
    let mut records = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let text = read_document(path)?;
        let parsed = parse_op_document(&text, path.as_str())?;
        debug!(path = %path, count = parsed.len(), "Loaded operator schema");
        records.extend(parsed);
    }
    Ok(records)
}
