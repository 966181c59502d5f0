//! # linenote-syntax
//!
//! Line spans of call-like and block-like nodes in source text.
//!
//! The annotation engine never looks at a syntax tree directly. It asks one
//! question of a parsed file: *which calls start at line L, which lines do
//! they cover, and if they carry a body, which lines does the body cover?*
//! This crate answers it.
//!
//! ## Pieces
//!
//! ```text
//! source text ──► SpanParser ──► SpanIndex ──► call_spans_starting_at(L)
//!                 (RustSpanParser)  (RustSpans)      → Vec<CallSpan>
//! ```
//!
//! - [`Span`]: inclusive `[min, max]` range of 1-based lines.
//! - [`CallSpan`]: a [`Span`] tagged [`NodeKind::Call`] or
//!   [`NodeKind::Block`], plus the body span of block-like nodes.
//! - [`SpanIndex`]: the query trait the engine consumes.
//! - [`SpanParser`]: builds an index from text. [`RustSpanParser`] uses
//!   tree-sitter with the Rust grammar.
//!
//! ## What counts as a block
//!
//! A call whose last argument is a closure (`show_with(|| { .. })`) and a
//! macro invoked with braces (`name! { .. }`). A `block` body covers the lines
//! between its braces, not the braces themselves, so `{ 33\n}` has a body on
//! the first line only.
//!
//! ```
//! use linenote_syntax::{RustSpans, Span, SpanIndex};
//!
//! let spans = RustSpans::parse("show(\n    55\n);\n").unwrap();
//! let at_one = spans.call_spans_starting_at(1);
//! assert_eq!(at_one[0].span, Span::new(1, 3));
//! ```

mod error;
mod index;
mod rust;
mod span;

pub use error::SyntaxError;
pub use index::{CallSpan, NodeKind, SpanIndex, SpanParser};
pub use rust::{RustSpanParser, RustSpans};
pub use span::Span;
