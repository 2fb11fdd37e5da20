// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Operator binding generator core.
//!
//! This crate contains everything the `opgen` binary needs short of file
//! output:
//! - Operator schema loading (parsed operator YAML documents)
//! - Primitive whitelist handling
//! - C++ signature derivation (argument and return types)
//! - Code generation for tensor operants and the extra-attribute maps
//!
//! Every generator is a pure function from loaded records to text, so the
//! whole pipeline can be tested without touching the filesystem.

pub mod codegen;
pub mod prim_list;
pub mod schema;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::codegen::extra_info::{CompatRecord, generate_extra_info};
    pub use crate::codegen::operants::{GenerationConfig, OperantsOutput, generate_operants};
    pub use crate::codegen::{CodeGenError, Result};
    pub use crate::prim_list::PrimList;
    pub use crate::schema::{OpRecord, SchemaError};
}
