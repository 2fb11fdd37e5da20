// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! C++ signature derivation for a single operator.
//!
//! A [`Signature`] is an [`OpRecord`] with every type name resolved to its
//! C++ spelling. Inplace operators (names ending in `_`) get mutable
//! reference parameters for their aliased inputs and reference return types
//! for the aliasing outputs. Once built, rendering a signature cannot fail.

use super::{OpRecord, Result, SchemaError, types};
use std::collections::BTreeMap;

/// A resolved parameter: C++ type, name, optional declaration default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub cpp_type: String,
    pub name: String,
    pub default: Option<String>,
}

impl Param {
    fn declare(&self) -> String {
        match &self.default {
            Some(default) => format!("{} {} = {default}", self.cpp_type, self.name),
            None => self.define(),
        }
    }

    fn define(&self) -> String {
        format!("{} {}", self.cpp_type, self.name)
    }
}

/// An operator signature ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    name: String,
    params: Vec<Param>,
    return_types: Vec<String>,
}

/// Input names may carry an `@` suffix naming the underlying variable.
fn base_name(name: &str) -> &str {
    name.split('@').next().unwrap_or(name)
}

impl Signature {
    /// Resolve a record's parameter and return types.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingField`] if `inputs`, `attrs` or
    /// `outputs` is absent, and [`SchemaError::UnknownType`] for any type
    /// name without a C++ mapping.
    pub fn from_record(record: &OpRecord) -> Result<Self> {
        let op = record.name.as_str();
        let missing = |field| SchemaError::MissingField {
            op: op.to_string(),
            field,
        };
        let inputs = record.inputs.as_ref().ok_or_else(|| missing("inputs"))?;
        let attrs = record.attrs.as_ref().ok_or_else(|| missing("attrs"))?;
        let outputs = record.outputs.as_ref().ok_or_else(|| missing("outputs"))?;

        let inplace_flag = op.ends_with('_');
        let empty = BTreeMap::new();
        let inplace_map = record.inplace.as_ref().unwrap_or(&empty);
        let unknown = |kind, name: &str, typename: &str| SchemaError::UnknownType {
            op: op.to_string(),
            kind,
            name: name.to_string(),
            typename: typename.to_string(),
        };

        let mut params = Vec::with_capacity(inputs.len() + attrs.len());
        for input in inputs {
            let name = base_name(&input.name);
            let lookup = if input.optional {
                types::optional_type(&input.typename)
            } else {
                types::input_type(&input.typename)
            };
            let mut cpp_type = lookup.ok_or_else(|| unknown("input", name, &input.typename))?;
            if inplace_flag && inplace_map.values().any(|target| target == name) {
                cpp_type = types::inplace_input_type(cpp_type)
                    .ok_or_else(|| unknown("input", name, &input.typename))?;
            }
            params.push(Param {
                cpp_type: cpp_type.to_string(),
                name: name.to_string(),
                default: None,
            });
        }

        for attr in attrs {
            let lookup = if attr.optional {
                types::optional_type(&attr.typename)
            } else {
                types::attr_type(&attr.typename)
            };
            let cpp_type = lookup.ok_or_else(|| unknown("attribute", &attr.name, &attr.typename))?;
            params.push(Param {
                cpp_type: cpp_type.to_string(),
                name: attr.name.clone(),
                default: attr.default_value.as_ref().map(ToString::to_string),
            });
        }

        let mut return_types = Vec::with_capacity(outputs.len());
        for output in outputs.iter().filter(|o| !o.intermediate) {
            let name = base_name(&output.name);
            let mut cpp_type =
                types::output_type(&output.typename).ok_or_else(|| unknown("output", name, &output.typename))?;
            if inplace_flag {
                if let Some(target) = inplace_map.get(name) {
                    let aliased_optional = inputs
                        .iter()
                        .any(|i| i.optional && base_name(&i.name) == target.as_str());
                    cpp_type = types::inplace_output_type(cpp_type, aliased_optional)
                        .ok_or_else(|| unknown("output", name, &output.typename))?;
                }
            }
            return_types.push(cpp_type.to_string());
        }

        Ok(Self {
            name: op.to_string(),
            params,
            return_types,
        })
    }

    /// Operator name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved parameters: inputs first, then attributes.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// The C++ return type. Multiple outputs become a `std::tuple`.
    #[must_use]
    pub fn return_type(&self) -> String {
        match self.return_types.as_slice() {
            [single] => single.clone(),
            many => format!("std::tuple<{}>", many.join(", ")),
        }
    }

    /// Parameter list for a declaration, with attribute defaults.
    #[must_use]
    pub fn declare_args(&self) -> String {
        self.params
            .iter()
            .map(Param::declare)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parameter list for a definition; defaults are never repeated.
    #[must_use]
    pub fn define_args(&self) -> String {
        self.params
            .iter()
            .map(Param::define)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Argument names for forwarding the call.
    #[must_use]
    pub fn call_args(&self) -> String {
        self.params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
