// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Schema type name → C++ type translation tables.
//!
//! Operator YAML uses short type names (`Tensor`, `int[]`, `Scalar(float)`).
//! Generated C++ signatures need the spelled-out parameter and return types.
//! Lookups return `None` for names with no mapping; callers turn that into a
//! [`SchemaError::UnknownType`](super::SchemaError::UnknownType).

/// C++ parameter type for a required tensor input.
#[must_use]
pub fn input_type(typename: &str) -> Option<&'static str> {
    match typename {
        "Tensor" => Some("const Tensor&"),
        "Tensor[]" => Some("const std::vector<Tensor>&"),
        _ => None,
    }
}

/// C++ parameter type for a required attribute.
#[must_use]
pub fn attr_type(typename: &str) -> Option<&'static str> {
    let cpp = match typename {
        "IntArray" => "const IntArray&",
        "Scalar" | "Scalar(int)" | "Scalar(int64_t)" | "Scalar(float)" | "Scalar(double)" => {
            "const Scalar&"
        }
        "Scalar[]" => "const std::vector<phi::Scalar>&",
        "int" => "int",
        "int32_t" => "int32_t",
        "int64_t" => "int64_t",
        "long" => "long",
        "size_t" => "size_t",
        "float" => "float",
        "float[]" => "const std::vector<float>&",
        "double" => "double",
        "bool" => "bool",
        "bool[]" => "const std::vector<bool>&",
        "str" => "const std::string&",
        "str[]" => "const std::vector<std::string>&",
        "Place" => "const Place&",
        "DataLayout" => "DataLayout",
        "DataType" => "DataType",
        "int64_t[]" => "const std::vector<int64_t>&",
        "int[]" => "const std::vector<int>&",
        _ => return None,
    };
    Some(cpp)
}

/// C++ parameter type for an optional input or attribute.
#[must_use]
pub fn optional_type(typename: &str) -> Option<&'static str> {
    let cpp = match typename {
        "Tensor" => "const paddle::optional<Tensor>&",
        "Tensor[]" => "const paddle::optional<std::vector<Tensor>>&",
        "int" => "paddle::optional<int>",
        "int32_t" => "paddle::optional<int32_t>",
        "int64_t" => "paddle::optional<int64_t>",
        "float" => "paddle::optional<float>",
        "double" => "paddle::optional<double>",
        "bool" => "paddle::optional<bool>",
        "Place" => "paddle::optional<const Place&>",
        "DataLayout" => "paddle::optional<DataLayout>",
        "DataType" => "paddle::optional<DataType>",
        _ => return None,
    };
    Some(cpp)
}

/// C++ return type for an output.
#[must_use]
pub fn output_type(typename: &str) -> Option<&'static str> {
    match typename {
        "Tensor" => Some("Tensor"),
        "Tensor[]" => Some("std::vector<Tensor>"),
        _ => None,
    }
}

/// Mutable reference form of an input parameter type, used for the targets
/// of an inplace operator.
#[must_use]
pub fn inplace_input_type(cpp_type: &str) -> Option<&'static str> {
    match cpp_type {
        "const Tensor&" => Some("Tensor&"),
        "const paddle::optional<Tensor>&" => Some("paddle::optional<Tensor>&"),
        "const std::vector<Tensor>&" => Some("std::vector<Tensor>&"),
        "const paddle::optional<std::vector<Tensor>>&" => {
            Some("paddle::optional<std::vector<Tensor>>&")
        }
        _ => None,
    }
}

/// Return type of an output that aliases an inplace input.
#[must_use]
pub fn inplace_output_type(cpp_type: &str, optional: bool) -> Option<&'static str> {
    match (cpp_type, optional) {
        ("Tensor", false) => Some("Tensor&"),
        ("std::vector<Tensor>", false) => Some("std::vector<Tensor>&"),
        ("Tensor", true) => Some("paddle::optional<Tensor>&"),
        ("std::vector<Tensor>", true) => Some("paddle::optional<std::vector<Tensor>>&"),
        _ => None,
    }
}
