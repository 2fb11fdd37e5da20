// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Document tree for C++ code generation.
//!
//! Codegen functions return `Document` values instead of writing into a
//! string buffer with manual indentation tracking. The tree is rendered in a
//! single final pass; `Line` emits a newline followed by the indentation of
//! the enclosing `Nest`.
//!
//! # Example
//!
//! ```
//! use opgen_core::codegen::document::{Document, line, nest};
//! use opgen_core::docvec;
//!
//! let doc = docvec![
//!     "Tensor add(const Tensor& x) {",
//!     nest(2, docvec![line(), "return ::add_ad_func(x);"]),
//!     line(),
//!     "}",
//! ];
//! assert_eq!(
//!     doc.to_pretty_string(),
//!     "Tensor add(const Tensor& x) {\n  return ::add_ad_func(x);\n}"
//! );
//! ```
//!
//! Based on Gleam's Document implementation; there is no line-width fitting
//! because generated C++ uses fixed formatting.

/// Indentation width used throughout C++ generation.
pub const INDENT: isize = 2;

/// A renderable document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document<'a> {
    /// A borrowed string literal.
    Str(&'a str),
    /// An owned string.
    String(String),
    /// A newline followed by current indentation.
    Line,
    /// Increase indentation for nested content.
    Nest(isize, Box<Document<'a>>),
    /// A sequence of documents.
    Vec(Vec<Document<'a>>),
    /// Empty document.
    Nil,
}

/// Coerce a value into a `Document`.
pub trait Documentable<'a> {
    fn to_doc(self) -> Document<'a>;
}

impl<'a> Documentable<'a> for &'a str {
    fn to_doc(self) -> Document<'a> {
        Document::Str(self)
    }
}

impl<'a> Documentable<'a> for &'a String {
    fn to_doc(self) -> Document<'a> {
        Document::Str(self.as_str())
    }
}

impl<'a> Documentable<'a> for String {
    fn to_doc(self) -> Document<'a> {
        Document::String(self)
    }
}

impl<'a> Documentable<'a> for Document<'a> {
    fn to_doc(self) -> Document<'a> {
        self
    }
}

impl<'a> Documentable<'a> for Vec<Document<'a>> {
    fn to_doc(self) -> Document<'a> {
        Document::Vec(self)
    }
}

/// Join multiple documents together in a vector.
///
/// Each element is converted with [`Documentable`]; no separator is inserted.
///
/// ```
/// use opgen_core::docvec;
///
/// let doc = docvec!["namespace ", "prim", " {"];
/// assert_eq!(doc.to_pretty_string(), "namespace prim {");
/// ```
#[macro_export]
macro_rules! docvec {
    () => {
        $crate::codegen::document::Document::Vec(Vec::new())
    };

    ($first:expr $(,)?) => {
        $crate::codegen::document::Document::Vec(
            vec![$crate::codegen::document::Documentable::to_doc($first)]
        )
    };

    ($first:expr, $($rest:expr),+ $(,)?) => {
        match $crate::codegen::document::Documentable::to_doc($first) {
            $crate::codegen::document::Document::Vec(mut vec) => {
                $(
                    vec.push($crate::codegen::document::Documentable::to_doc($rest));
                )*
                $crate::codegen::document::Document::Vec(vec)
            },
            first => {
                $crate::codegen::document::Document::Vec(
                    vec![first, $($crate::codegen::document::Documentable::to_doc($rest)),+]
                )
            }
        }
    };
}

/// Creates a `Line` document.
#[must_use]
pub fn line() -> Document<'static> {
    Document::Line
}

/// Creates a `Nest` document.
#[must_use]
pub fn nest(indent: isize, doc: Document<'_>) -> Document<'_> {
    Document::Nest(indent, Box::new(doc))
}

/// Joins documents with a separator between each pair.
#[must_use]
pub fn join<'a>(
    docs: impl IntoIterator<Item = Document<'a>>,
    separator: &Document<'a>,
) -> Document<'a> {
    let mut result = Vec::new();
    for doc in docs {
        if !result.is_empty() {
            result.push(separator.clone());
        }
        result.push(doc);
    }
    if result.is_empty() {
        Document::Nil
    } else {
        Document::Vec(result)
    }
}

impl Document<'_> {
    /// Renders the document to a string.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        let mut output = String::new();
        self.render_to(&mut output, 0);
        output
    }

    fn render_to(&self, output: &mut String, indent: isize) {
        match self {
            Document::Str(s) => output.push_str(s),
            Document::String(s) => output.push_str(s),
            Document::Nil => {}
            Document::Line => {
                output.push('\n');
                write_indent(output, indent);
            }
            Document::Nest(extra, doc) => doc.render_to(output, indent + extra),
            Document::Vec(docs) => {
                for doc in docs {
                    doc.render_to(output, indent);
                }
            }
        }
    }
}

fn write_indent(output: &mut String, indent: isize) {
    for _ in 0..indent {
        output.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_document() {
        let doc = Document::Vec(vec![Document::Str("a"), Document::Line, Document::Str("b")]);
        assert_eq!(doc.to_pretty_string(), "a\nb");
    }

    #[test]
    fn nested_nest() {
        let doc = nest(
            2,
            docvec![line(), "outer", nest(2, docvec![line(), "inner"])],
        );
        assert_eq!(doc.to_pretty_string(), "\n  outer\n    inner");
    }

    #[test]
    fn line_after_nest_returns_to_outer_indent() {
        let doc = docvec!["{", nest(INDENT, docvec![line(), "body;"]), line(), "}"];
        assert_eq!(doc.to_pretty_string(), "{\n  body;\n}");
    }

    #[test]
    fn docvec_macro_empty() {
        assert_eq!(docvec![].to_pretty_string(), "");
    }

    #[test]
    fn docvec_macro_mixed_types() {
        let owned = String::from("world");
        let borrowed = String::from("!");
        let doc = docvec!["hello ", owned, &borrowed];
        assert_eq!(doc.to_pretty_string(), "hello world!");
    }

    #[test]
    fn docvec_flattens_leading_vec() {
        let inner = docvec!["a", "b"];
        let doc = docvec![inner, "c"];
        assert_eq!(doc.to_pretty_string(), "abc");
        if let Document::Vec(v) = doc {
            assert_eq!(v.len(), 3);
        } else {
            panic!("Expected Vec");
        }
    }

    #[test]
    fn join_documents() {
        let docs = vec![Document::Str("a"), Document::Str("b"), Document::Str("c")];
        let doc = join(docs, &Document::Str(", "));
        assert_eq!(doc.to_pretty_string(), "a, b, c");
    }

    #[test]
    fn join_empty_is_nil() {
        let doc = join(Vec::<Document>::new(), &Document::Str(", "));
        assert_eq!(doc, Document::Nil);
    }

    #[test]
    fn join_with_line_separator_keeps_indent() {
        let items = ["{\"a\", 1}", "{\"b\", 2}"].map(Document::Str);
        let doc = nest(4, docvec![line(), join(items, &docvec![",", line()])]);
        assert_eq!(doc.to_pretty_string(), "\n    {\"a\", 1},\n    {\"b\", 2}");
    }
}
