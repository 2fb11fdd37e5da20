// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Extra attribute map generation.
//!
//! Legacy operators carry "extra" attributes that are not part of their
//! modern signature but must still be accepted and defaulted. The operator
//! compatibility table lists them per operator:
//!
//! ```yaml
//! - op : conv2d
//!   backward : conv2d_grad
//!   extra :
//!     attrs : [bool use_cudnn = true, bool use_mkldnn = false]
//! ```
//!
//! This module turns that table into the `ExtraInfoUtils` constructor, which
//! fills two maps keyed by operator name: attribute defaults and attribute
//! checkers. Backward operators share the forward operator's entries.

use super::document::{Document, INDENT, join, line, nest};
use super::{CodeGenError, Result};
use crate::docvec;
use crate::schema;
use camino::Utf8Path;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::debug;

const PREAMBLE: &str = r#"// This file is generated by opgen extra-info
#include "paddle/fluid/operators/ops_extra_info.h"

#include "paddle/phi/backends/gpu/cuda/cudnn_workspace_helper.h"

namespace paddle {
namespace operators {

ExtraInfoUtils::ExtraInfoUtils() {"#;

const POSTAMBLE: &str = "
}

}  // namespace operators
}  // namespace paddle
";

static ATTR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<attr_type>[a-zA-Z0-9_\[\]]+)\s+(?P<name>[a-zA-Z0-9_]+)\s*=\s*(?P<default_val>\S+)")
        .expect("extra attribute pattern is valid")
});

/// One entry of the operator compatibility table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompatRecord {
    /// `name` or `name (legacy_name)`.
    pub op: String,
    /// Comma-separated backward operators, same form as `op`.
    #[serde(default)]
    pub backward: Option<String>,
    #[serde(default)]
    pub extra: Option<ExtraArgs>,
}

/// The `extra` section of a compatibility entry.
///
/// Only `attrs` is consumed; `inputs` and `outputs` are accepted so that
/// tables listing them still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExtraArgs {
    #[serde(default)]
    pub attrs: Option<Vec<String>>,
    #[serde(default)]
    pub inputs: Option<Vec<String>>,
    #[serde(default)]
    pub outputs: Option<Vec<String>>,
}

/// A parsed extra attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraAttr {
    pub cpp_type: &'static str,
    pub name: String,
    pub default: String,
}

impl ExtraAttr {
    /// `{"name", T{default}}`, or `{"name", T<default>}` for vectors whose
    /// default is already a brace list.
    #[must_use]
    pub fn map_entry(&self) -> String {
        if self.cpp_type.starts_with("std::vector") {
            format!("{{\"{}\", {}{}}}", self.name, self.cpp_type, self.default)
        } else {
            format!("{{\"{}\", {}{{{}}}}}", self.name, self.cpp_type, self.default)
        }
    }

    /// Checker closure validating (and defaulting) the attribute.
    #[must_use]
    pub fn checker(&self) -> String {
        format!(
            "[](framework::AttributeMap* attr_map, bool only_check_exist_value)-> void \
             {{ ExtraAttrChecker<{}>(\"{}\", {})(attr_map, only_check_exist_value);}}",
            self.cpp_type, self.name, self.default
        )
    }
}

fn attr_cpp_type(attr_type: &str) -> Option<&'static str> {
    let cpp = match attr_type {
        "bool" => "bool",
        "int" => "int",
        "int64_t" => "int64_t",
        "float" => "float",
        "double" => "double",
        "str" => "std::string",
        "int[]" => "std::vector<int>",
        "int64_t[]" => "std::vector<int64_t>",
        "float[]" => "std::vector<float>",
        "double[]" => "std::vector<double>",
        "str[]" => "std::vector<std::string>",
        _ => return None,
    };
    Some(cpp)
}

/// Parse `<type> <name> = <default>`.
///
/// # Errors
///
/// Returns [`CodeGenError::MalformedAttr`] if the text does not match and
/// [`CodeGenError::UnsupportedAttrType`] if the type has no C++ mapping.
pub fn parse_attr(op: &str, text: &str) -> Result<ExtraAttr> {
    let caps = ATTR_PATTERN
        .captures(text)
        .ok_or_else(|| CodeGenError::MalformedAttr {
            op: op.to_string(),
            attr: text.to_string(),
        })?;
    let name = caps["name"].to_string();
    let cpp_type =
        attr_cpp_type(&caps["attr_type"]).ok_or_else(|| CodeGenError::UnsupportedAttrType {
            op: op.to_string(),
            name: name.clone(),
            attr_type: caps["attr_type"].to_string(),
        })?;
    Ok(ExtraAttr {
        cpp_type,
        name,
        default: caps["default_val"].to_string(),
    })
}

/// The operator name a compatibility item refers to: the legacy name in
/// parentheses if present, otherwise the whole item.
#[must_use]
pub fn op_name(item: &str) -> &str {
    match item.split_once('(') {
        None => item.trim(),
        Some((_, rest)) => rest.split(')').next().unwrap_or(rest).trim(),
    }
}

/// Parse a compatibility table document.
///
/// # Errors
///
/// Returns a schema parse error if the text is not a list of entries.
pub fn parse_compat_document(text: &str, origin: &str) -> schema::Result<Vec<CompatRecord>> {
    schema::parse_list(text, origin)
}

/// Read and parse a compatibility table file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_compat_document(path: &Utf8Path) -> schema::Result<Vec<CompatRecord>> {
    let text = schema::read_document(path)?;
    let records = parse_compat_document(&text, path.as_str())?;
    debug!(path = %path, count = records.len(), "Loaded compat table");
    Ok(records)
}

fn map_entry(op: &str, attrs: &[ExtraAttr]) -> Document<'static> {
    let entries: Vec<String> = attrs.iter().map(ExtraAttr::map_entry).collect();
    Document::String(format!("{{\"{op}\", {{ {} }}}}", entries.join(", ")))
}

fn checker_entry(op: &str, attrs: &[ExtraAttr]) -> Document<'static> {
    let checkers = attrs.iter().map(|a| Document::String(a.checker()));
    docvec![
        format!("{{\"{op}\", {{ "),
        nest(INDENT, join(checkers, &docvec![",", line()])),
        " }}",
    ]
}

fn map_block<'a>(field: &'a str, entries: Vec<Document<'a>>) -> Document<'a> {
    docvec![
        field,
        " = {",
        nest(INDENT, docvec![line(), join(entries, &docvec![",", line()])]),
        line(),
        "};",
    ]
}

/// Generate the `ExtraInfoUtils` constructor source from a compatibility table.
///
/// # Errors
///
/// Fails on the first malformed or unsupported extra attribute.
pub fn generate_extra_info(records: &[CompatRecord]) -> Result<String> {
    let mut maps = Vec::new();
    let mut checkers = Vec::new();

    for record in records {
        let Some(attr_texts) = record.extra.as_ref().and_then(|e| e.attrs.as_ref()) else {
            continue;
        };
        let forward = op_name(&record.op);
        let attrs = attr_texts
            .iter()
            .map(|text| parse_attr(forward, text))
            .collect::<Result<Vec<_>>>()?;
        debug!(op = forward, count = attrs.len(), "Emitting extra attributes");

        let backward = record.backward.as_deref().into_iter().flat_map(|b| b.split(','));
        for name in std::iter::once(forward).chain(backward.map(op_name)) {
            maps.push(map_entry(name, &attrs));
            checkers.push(checker_entry(name, &attrs));
        }
    }

    let body = docvec![
        PREAMBLE,
        nest(
            INDENT,
            docvec![
                line(),
                map_block("g_extra_attrs_map_", maps),
                "\n",
                line(),
                map_block("g_extra_attrs_checker_", checkers),
            ]
        ),
        POSTAMBLE,
    ];
    Ok(body.to_pretty_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(cpp_type: &str, name: &str, default: &str) -> String {
        format!(
            "[](framework::AttributeMap* attr_map, bool only_check_exist_value)-> void \
             {{ ExtraAttrChecker<{cpp_type}>(\"{name}\", {default})(attr_map, only_check_exist_value);}}"
        )
    }

    fn file(maps: &str, checkers: &str) -> String {
        format!(
            "{PREAMBLE}\n  g_extra_attrs_map_ = {{\n    {maps}\n  }};\n\n  \
             g_extra_attrs_checker_ = {{\n    {checkers}\n  }};{POSTAMBLE}"
        )
    }

    #[test]
    fn parse_scalar_attr() {
        let attr = parse_attr("conv2d", "bool use_cudnn = true").unwrap();
        assert_eq!(attr.cpp_type, "bool");
        assert_eq!(attr.name, "use_cudnn");
        assert_eq!(attr.default, "true");
        assert_eq!(attr.map_entry(), "{\"use_cudnn\", bool{true}}");
    }

    #[test]
    fn parse_vector_attr() {
        let attr = parse_attr("conv2d", "int[] fuse_reshape = {}").unwrap();
        assert_eq!(attr.cpp_type, "std::vector<int>");
        assert_eq!(attr.map_entry(), "{\"fuse_reshape\", std::vector<int>{}}");
    }

    #[test]
    fn parse_string_attr_keeps_quotes() {
        let attr = parse_attr("matmul", "str mkldnn_data_type = \"float32\"").unwrap();
        assert_eq!(attr.cpp_type, "std::string");
        assert_eq!(attr.default, "\"float32\"");
    }

    #[test]
    fn malformed_attr_is_rejected() {
        let err = parse_attr("conv2d", "use_cudnn").unwrap_err();
        assert!(matches!(err, CodeGenError::MalformedAttr { .. }));
    }

    #[test]
    fn unsupported_attr_type_is_rejected() {
        let err = parse_attr("conv2d", "complex64 c = 0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "operator 'conv2d': unsupported extra attribute type 'complex64' for 'c'"
        );
    }

    #[test]
    fn op_name_prefers_legacy_name() {
        assert_eq!(op_name("matmul (matmul_v2)"), "matmul_v2");
        assert_eq!(op_name(" conv2d "), "conv2d");
        assert_eq!(op_name("matmul_grad (matmul_v2_grad)"), "matmul_v2_grad");
    }

    #[test]
    fn empty_table_renders_empty_maps() {
        assert_eq!(generate_extra_info(&[]).unwrap(), file("", ""));
    }

    #[test]
    fn entries_without_extra_attrs_are_skipped() {
        let records = parse_compat_document(
            "- op : abs\n- op : relu\n  extra :\n    inputs : [x]\n",
            "op_compat.yaml",
        )
        .unwrap();
        assert_eq!(generate_extra_info(&records).unwrap(), file("", ""));
    }

    #[test]
    fn full_table() {
        let records = parse_compat_document(
            r#"
- op : conv2d
  backward : conv2d_grad
  extra :
    attrs : [bool use_cudnn = true, 'int[] fuse_reshape = {}']
- op : abs
- op : matmul (matmul_v2)
  backward : matmul_grad (matmul_v2_grad), matmul_double_grad (matmul_v2_double_grad)
  extra :
    attrs : [str mkldnn_data_type = "float32"]
"#,
            "op_compat.yaml",
        )
        .unwrap();

        let conv_map = "{ {\"use_cudnn\", bool{true}}, {\"fuse_reshape\", std::vector<int>{}} }";
        let conv_checkers = format!(
            "{{ {},\n      {} }}",
            checker("bool", "use_cudnn", "true"),
            checker("std::vector<int>", "fuse_reshape", "{}")
        );
        let matmul_map = "{ {\"mkldnn_data_type\", std::string{\"float32\"}} }";
        let matmul_checkers = format!(
            "{{ {} }}",
            checker("std::string", "mkldnn_data_type", "\"float32\"")
        );

        let maps = [
            format!("{{\"conv2d\", {conv_map}}}"),
            format!("{{\"conv2d_grad\", {conv_map}}}"),
            format!("{{\"matmul_v2\", {matmul_map}}}"),
            format!("{{\"matmul_v2_grad\", {matmul_map}}}"),
            format!("{{\"matmul_v2_double_grad\", {matmul_map}}}"),
        ]
        .join(",\n    ");
        let checkers = [
            format!("{{\"conv2d\", {conv_checkers}}}"),
            format!("{{\"conv2d_grad\", {conv_checkers}}}"),
            format!("{{\"matmul_v2\", {matmul_checkers}}}"),
            format!("{{\"matmul_v2_grad\", {matmul_checkers}}}"),
            format!("{{\"matmul_v2_double_grad\", {matmul_checkers}}}"),
        ]
        .join(",\n    ");

        assert_eq!(generate_extra_info(&records).unwrap(), file(&maps, &checkers));
    }

    #[test]
    fn malformed_attr_fails_generation() {
        let records =
            parse_compat_document("- op : conv2d\n  extra :\n    attrs : [oops]\n", "c.yaml")
                .unwrap();
        assert!(generate_extra_info(&records).is_err());
    }
}
