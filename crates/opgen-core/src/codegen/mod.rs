// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Code generation for operator bindings.
//!
//! - **`operants`**: eager and static `TensorOperants` classes (four files)
//! - **`extra_info`**: the legacy extra-attribute map initialiser (one file)
//!
//! Both generators build their output with the [`document`] tree and return
//! plain strings; writing files is left to the caller.

pub mod document;
pub mod extra_info;
pub mod operants;


use crate::schema::SchemaError;
use thiserror::Error;

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum CodeGenError {
    /// A schema record could not be turned into a signature.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// An extra attribute string does not have the `<type> <name> = <default>` form.
    #[error("operator '{op}': malformed extra attribute '{attr}'")]
    MalformedAttr {
        /// Operator the attribute belongs to.
        op: String,
        /// The attribute text as written.
        attr: String,
    },

    /// An extra attribute type with no C++ mapping.
    #[error("operator '{op}': unsupported extra attribute type '{attr_type}' for '{name}'")]
    UnsupportedAttrType {
        /// Operator the attribute belongs to.
        op: String,
        /// Attribute name.
        name: String,
        /// The unrecognized type name.
        attr_type: String,
    },
}

/// Result type for code generation operations.
pub type Result<T> = std::result::Result<T, CodeGenError>;
