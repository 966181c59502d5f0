use std::collections::BTreeMap;

use tree_sitter::{Node, Parser};
use tree_sitter_rust::LANGUAGE;

use crate::index::{CallSpan, SpanIndex, SpanParser};
use crate::{Span, SyntaxError};

/// Call and block spans of a Rust source file, grouped by start line.
///
/// The tree-sitter tree is walked once at parse time and dropped; only the
/// line spans survive, so the index is plain data and cheap to keep around.
#[derive(Debug, Default)]
pub struct RustSpans {
    by_start: BTreeMap<usize, Vec<CallSpan>>,
    has_errors: bool,
}

impl RustSpans {
    /// Parse `text` as Rust and collect its call spans.
    ///
    /// Syntax errors do not fail the parse: tree-sitter recovers and the
    /// spans around the error are still usable. Check [`Self::has_errors`].
    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        let mut parser = Parser::new();
        parser.set_language(&LANGUAGE.into())?;
        let tree = parser.parse(text, None).ok_or(SyntaxError::NoTree)?;

        let root = tree.root_node();
        let mut spans = Self {
            by_start: BTreeMap::new(),
            has_errors: root.has_error(),
        };
        if spans.has_errors {
            log::warn!("Rust source contains syntax errors; spans near them may be partial");
        }
        spans.collect(root);
        Ok(spans)
    }

    /// Whether the parsed tree contained error or missing nodes.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Every collected span, ordered by start line.
    pub fn iter(&self) -> impl Iterator<Item = &CallSpan> {
        self.by_start.values().flatten()
    }

    fn collect(&mut self, node: Node<'_>) {
        if let Some(cs) = classify(node) {
            self.by_start.entry(cs.span.min).or_default().push(cs);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect(child);
        }
    }
}

impl SpanIndex for RustSpans {
    fn call_spans_starting_at(&self, line: usize) -> Vec<CallSpan> {
        self.by_start.get(&line).cloned().unwrap_or_default()
    }
}

/// [`SpanParser`] for Rust source.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustSpanParser;

impl SpanParser for RustSpanParser {
    fn parse(&self, text: &str) -> Result<Box<dyn SpanIndex + Send + Sync>, SyntaxError> {
        Ok(Box::new(RustSpans::parse(text)?))
    }
}

fn classify(node: Node<'_>) -> Option<CallSpan> {
    match node.kind() {
        "call_expression" => {
            let span = Span::new(call_line(node), end_line(node));
            let closure = node
                .child_by_field_name("arguments")
                .and_then(trailing_closure);
            Some(match closure {
                Some(closure) => CallSpan::block(span, closure_body(closure)),
                None => CallSpan::call(span),
            })
        }
        "macro_invocation" => {
            let span = Span::new(start_line(node), end_line(node));
            let mut cursor = node.walk();
            let tokens = node
                .children(&mut cursor)
                .find(|child| child.kind() == "token_tree");
            Some(match tokens {
                Some(tokens) if opens_with_brace(tokens) => {
                    CallSpan::block(span, delimited_inner(tokens))
                }
                _ => CallSpan::call(span),
            })
        }
        _ => None,
    }
}

/// The line a call is reported from. For method calls that is the line of
/// the method name, which may sit below the receiver in a chain.
fn call_line(call: Node<'_>) -> usize {
    let mut function = call.child_by_field_name("function");
    while let Some(f) = function {
        match f.kind() {
            "generic_function" => function = f.child_by_field_name("function"),
            "field_expression" => {
                return f
                    .child_by_field_name("field")
                    .map_or_else(|| start_line(call), start_line);
            }
            _ => break,
        }
    }
    start_line(call)
}

fn trailing_closure(arguments: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = arguments.walk();
    let last = arguments
        .named_children(&mut cursor)
        .filter(|arg| !is_comment(*arg))
        .last()?;
    (last.kind() == "closure_expression").then_some(last)
}

fn closure_body(closure: Node<'_>) -> Option<Span> {
    let body = closure.child_by_field_name("body")?;
    if body.kind() == "block" {
        delimited_inner(body)
    } else {
        Some(Span::new(start_line(body), end_line(body)))
    }
}

/// Lines spanned by the children between a node's `{` and its matching `}`.
fn delimited_inner(node: Node<'_>) -> Option<Span> {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    let open = children.iter().position(|c| is_open_delimiter(c.kind()))?;
    let close = children.iter().rposition(|c| is_close_delimiter(c.kind()))?;
    if close <= open + 1 {
        return None;
    }
    let inner = &children[open + 1..close];
    let first = inner.first()?;
    let last = inner.last()?;
    Some(Span::new(start_line(*first), end_line(*last)))
}

fn opens_with_brace(tokens: Node<'_>) -> bool {
    let mut cursor = tokens.walk();
    let first = tokens.children(&mut cursor).next();
    first.is_some_and(|first| first.kind() == "{")
}

fn is_open_delimiter(kind: &str) -> bool {
    matches!(kind, "{" | "(" | "[")
}

fn is_close_delimiter(kind: &str) -> bool {
    matches!(kind, "}" | ")" | "]")
}

fn is_comment(node: Node<'_>) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment")
}

fn start_line(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// tree-sitter end positions are exclusive: a node ending at column 0 of a
/// row actually ended on the row before.
fn end_line(node: Node<'_>) -> usize {
    let start = node.start_position();
    let end = node.end_position();
    if end.column == 0 && end.row > start.row {
        end.row
    } else {
        end.row + 1
    }
}
