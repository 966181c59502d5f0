use crate::{Span, SyntaxError};

/// Whether a node is a plain call or a call carrying a delimited body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `f(x)`, `recv.method(x)`, `name!(x)`
    Call,
    /// `f(|| { .. })`, `name! { .. }`
    Block,
}

/// Line span of one call-like or block-like node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSpan {
    pub kind: NodeKind,
    /// Lines covered by the whole node.
    pub span: Span,
    /// Lines between the body's opening and closing markers, for block-like
    /// nodes whose body is not empty.
    pub body: Option<Span>,
}

impl CallSpan {
    pub fn call(span: Span) -> Self {
        Self {
            kind: NodeKind::Call,
            span,
            body: None,
        }
    }

    pub fn block(span: Span, body: Option<Span>) -> Self {
        Self {
            kind: NodeKind::Block,
            span,
            body,
        }
    }

    pub fn is_block(&self) -> bool {
        self.kind == NodeKind::Block
    }
}

/// Answers span queries over one parsed source file.
pub trait SpanIndex {
    /// All call-like and block-like nodes whose span starts at `line`.
    fn call_spans_starting_at(&self, line: usize) -> Vec<CallSpan>;
}

/// A flat list of spans is an index too; handy for parsers that already
/// produce their spans up front.
impl SpanIndex for [CallSpan] {
    fn call_spans_starting_at(&self, line: usize) -> Vec<CallSpan> {
        self.iter().filter(|cs| cs.span.min == line).copied().collect()
    }
}

impl SpanIndex for Vec<CallSpan> {
    fn call_spans_starting_at(&self, line: usize) -> Vec<CallSpan> {
        self.as_slice().call_spans_starting_at(line)
    }
}

/// Turns source text into a [`SpanIndex`].
pub trait SpanParser {
    fn parse(&self, text: &str) -> Result<Box<dyn SpanIndex + Send + Sync>, SyntaxError>;
}
