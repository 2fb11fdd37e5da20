// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Tensor operants generation.
//!
//! Produces four C++ files from the operator schema:
//!
//! | File           | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | eager header   | `EagerTensorOperants` class with one declaration per op |
//! | eager source   | definitions forwarding to `::<op>_ad_func`             |
//! | static header  | `StaticTensorOperants` class, same declarations        |
//! | static source  | definitions forwarding to `paddle::prim::<op><DescTensor>` |
//!
//! Both headers receive byte-identical declarations. An operator is emitted
//! only when it is on the configured [`PrimList`]; emission follows schema
//! order and duplicates are emitted as many times as they appear.

use super::Result;
use super::document::{Document, INDENT, line, nest};
use crate::docvec;
use crate::prim_list::PrimList;
use crate::schema::{OpRecord, Signature};
use std::fmt;
use tracing::{debug, trace};

const EAGER_HEADER_PREAMBLE: &str = r#"// Generated by opgen operants

#pragma once

#include "paddle/phi/api/include/operants_base.h"
#include "paddle/phi/api/include/tensor.h"
#include "paddle/phi/core/macros.h"


namespace paddle {

namespace prim {

using Tensor = paddle::experimental::Tensor;
using TensorOperantsBase = paddle::operants::TensorOperantsBase;

class EagerTensorOperants : public TensorOperantsBase {
 private:
  DISABLE_COPY_AND_ASSIGN(EagerTensorOperants);

 public:
  EagerTensorOperants() = default;

"#;

const EAGER_SOURCE_PREAMBLE: &str = r#"// Generated by opgen operants

#include "paddle/fluid/prim/utils/eager/eager_tensor_operants.h"

#include "paddle/fluid/eager/api/generated/eager_generated/forwards/dygraph_functions.h"


namespace paddle {

namespace prim {

"#;

const STATIC_HEADER_PREAMBLE: &str = r#"// Generated by opgen operants

#pragma once

#include "paddle/phi/api/include/operants_base.h"
#include "paddle/phi/api/include/tensor.h"
#include "paddle/phi/core/macros.h"


namespace paddle {

namespace prim {

using Tensor = paddle::experimental::Tensor;
using TensorOperantsBase = paddle::operants::TensorOperantsBase;

class StaticTensorOperants : public TensorOperantsBase {
 private:
  DISABLE_COPY_AND_ASSIGN(StaticTensorOperants);

 public:
  StaticTensorOperants() = default;

"#;

const STATIC_SOURCE_PREAMBLE: &str = r#"// Generated by opgen operants

#include "paddle/fluid/prim/utils/static/static_tensor_operants.h"

#include "paddle/fluid/prim/api/generated_prim/prim_generated_api.h"
#include "paddle/fluid/prim/utils/static/desc_tensor.h"


namespace paddle {

namespace prim {
using DescTensor = paddle::prim::DescTensor;

"#;

const HEADER_POSTAMBLE: &str = "};

}  // namespace prim
}  // namespace paddle

";

const SOURCE_POSTAMBLE: &str = "
}  // namespace prim
}  // namespace paddle

";

/// The two generated operant classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperantsClass {
    /// Immediate execution through the autodiff forward functions.
    Eager,
    /// Graph construction through the `DescTensor` prim API.
    Static,
}

impl OperantsClass {
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            OperantsClass::Eager => "EagerTensorOperants",
            OperantsClass::Static => "StaticTensorOperants",
        }
    }
}

/// One of the four generated files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperantsFile {
    EagerHeader,
    EagerSource,
    StaticHeader,
    StaticSource,
}

impl OperantsFile {
    /// All files, in the order they are written.
    pub const ALL: [OperantsFile; 4] = [
        OperantsFile::EagerHeader,
        OperantsFile::EagerSource,
        OperantsFile::StaticHeader,
        OperantsFile::StaticSource,
    ];

    pub(crate) fn preamble(self) -> &'static str {
        match self {
            OperantsFile::EagerHeader => EAGER_HEADER_PREAMBLE,
            OperantsFile::EagerSource => EAGER_SOURCE_PREAMBLE,
            OperantsFile::StaticHeader => STATIC_HEADER_PREAMBLE,
            OperantsFile::StaticSource => STATIC_SOURCE_PREAMBLE,
        }
    }

    pub(crate) fn postamble(self) -> &'static str {
        match self {
            OperantsFile::EagerHeader | OperantsFile::StaticHeader => HEADER_POSTAMBLE,
            OperantsFile::EagerSource | OperantsFile::StaticSource => SOURCE_POSTAMBLE,
        }
    }
}

impl fmt::Display for OperantsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperantsFile::EagerHeader => "eager header",
            OperantsFile::EagerSource => "eager source",
            OperantsFile::StaticHeader => "static header",
            OperantsFile::StaticSource => "static source",
        })
    }
}

/// Settings for one operants generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    /// Operators eligible for emission.
    pub prims: PrimList,
}

impl GenerationConfig {
    #[must_use]
    pub fn new(prims: PrimList) -> Self {
        Self { prims }
    }

    /// Whether `record` is a primitive operator under this configuration.
    #[must_use]
    pub fn is_prim_api(&self, record: &OpRecord) -> bool {
        self.prims.contains(&record.name)
    }
}

/// The rendered contents of the four operants files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperantsOutput {
    pub eager_header: String,
    pub eager_source: String,
    pub static_header: String,
    pub static_source: String,
    /// Names of the emitted operators, in emission order.
    pub emitted: Vec<String>,
}

impl OperantsOutput {
    fn with_preambles() -> Self {
        Self {
            eager_header: OperantsFile::EagerHeader.preamble().to_string(),
            eager_source: OperantsFile::EagerSource.preamble().to_string(),
            static_header: OperantsFile::StaticHeader.preamble().to_string(),
            static_source: OperantsFile::StaticSource.preamble().to_string(),
            emitted: Vec::new(),
        }
    }

    fn push(&mut self, sig: &Signature) {
        let decl = declaration(sig);
        self.eager_header.push_str(&decl);
        self.static_header.push_str(&decl);
        self.eager_source
            .push_str(&definition(sig, OperantsClass::Eager));
        self.static_source
            .push_str(&definition(sig, OperantsClass::Static));
        self.emitted.push(sig.name().to_string());
    }

    fn finish(mut self) -> Self {
        for file in OperantsFile::ALL {
            self.buffer_mut(file).push_str(file.postamble());
        }
        self
    }

    fn buffer_mut(&mut self, file: OperantsFile) -> &mut String {
        match file {
            OperantsFile::EagerHeader => &mut self.eager_header,
            OperantsFile::EagerSource => &mut self.eager_source,
            OperantsFile::StaticHeader => &mut self.static_header,
            OperantsFile::StaticSource => &mut self.static_source,
        }
    }

    /// Text of one generated file.
    #[must_use]
    pub fn contents(&self, file: OperantsFile) -> &str {
        match file {
            OperantsFile::EagerHeader => &self.eager_header,
            OperantsFile::EagerSource => &self.eager_source,
            OperantsFile::StaticHeader => &self.static_header,
            OperantsFile::StaticSource => &self.static_source,
        }
    }
}

/// Render the class member declaration for `sig`.
///
/// ```text
///   Tensor add(const Tensor& x, const Tensor& y);
///
/// ```
#[must_use]
pub fn declaration(sig: &Signature) -> String {
    docvec![
        "  ",
        sig.return_type(),
        " ",
        sig.name(),
        "(",
        sig.declare_args(),
        ");",
        line(),
        line(),
    ]
    .to_pretty_string()
}

/// Render the out-of-class definition of `sig` for `class`.
#[must_use]
pub fn definition(sig: &Signature, class: OperantsClass) -> String {
    let name = sig.name();
    let callee: Document<'_> = match class {
        OperantsClass::Eager => docvec!["::", name, "_ad_func"],
        OperantsClass::Static => docvec!["paddle::prim::", name, "<DescTensor>"],
    };
    docvec![
        sig.return_type(),
        " ",
        class.class_name(),
        "::",
        name,
        "(",
        sig.define_args(),
        ") {",
        nest(
            INDENT,
            docvec![line(), "return ", callee, "(", sig.call_args(), ");"]
        ),
        line(),
        "}",
        line(),
        line(),
    ]
    .to_pretty_string()
}

/// Generate the four operants files from `records`.
///
/// # Errors
///
/// Returns [`CodeGenError::Schema`](super::CodeGenError::Schema) if an
/// eligible record is missing a signature field or uses an unknown type.
/// Ineligible records are skipped without inspection.
pub fn generate_operants(records: &[OpRecord], config: &GenerationConfig) -> Result<OperantsOutput> {
    let mut output = OperantsOutput::with_preambles();
    for record in records {
        if !config.is_prim_api(record) {
            trace!(op = %record.name, "Skipping non-primitive operator");
            continue;
        }
        let sig = Signature::from_record(record)?;
        debug!(op = %record.name, "Emitting tensor operants");
        output.push(&sig);
    }
    Ok(output.finish())
}
