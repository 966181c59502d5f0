use std::sync::OnceLock;

use linenote_syntax::{Span, SpanIndex};
use regex::Regex;

use super::InsertionPoint;
use crate::options::Options;
use crate::source::LineStore;

/// Compute where the values recorded at `origin_line` are written.
///
/// 1. Every call or block node starting on the origin line extends the
///    affected region to its last line, so multi-line argument lists and
///    trailing closures are stepped over.
/// 2. For block recordings, the body of those nodes decides the placement:
///    values go after the body's last line, at the body's own indentation.
/// 3. Without a usable body, a block call that ends on a lone closing brace
///    emits just above that brace, one level deeper than it.
/// 4. Anything else emits after the call's last line at the call's indent.
///
/// Never fails: a line with no spans at all degrades to emitting right after
/// the origin line.
pub fn resolve(
    lines: &LineStore,
    spans: &dyn SpanIndex,
    origin_line: usize,
    had_block: bool,
    options: &Options,
) -> InsertionPoint {
    let candidates = spans.call_spans_starting_at(origin_line);
    if candidates.is_empty() {
        log::debug!("no call spans start at line {origin_line}; using a degenerate insertion point");
    }

    let mut last_line = origin_line;
    // The widest body seen so far, with the last line of the node owning it.
    let mut body: Option<(Span, usize)> = None;
    for cs in &candidates {
        last_line = last_line.max(cs.span.max);
        if had_block && cs.is_block() {
            if let Some(found) = cs.body {
                // An outer node seen after an inner one must not shrink the range.
                match body {
                    Some((current, _)) if current.max >= found.max => {}
                    _ => body = Some((found, cs.span.max)),
                }
            }
        }
    }

    let body = body.and_then(|(b, node_end)| {
        exclude_origin_line(b, origin_line).and_then(|b| drop_own_closing_line(lines, b, node_end))
    });
    let body_indent = body.and_then(|b| guess_indent(lines, b, options.tabstop).map(|i| (b, i)));

    let (emission_line, indent) = match body_indent {
        Some((body, indent)) => (body.max, indent),
        None if had_block && lines.line(last_line).is_some_and(is_closing_delimiter) => {
            let indent = format!("{}{}", lines.indent_of(last_line), options.default_indent);
            ((last_line - 1).max(origin_line), indent)
        }
        None => (last_line, lines.indent_of(origin_line).to_string()),
    };

    log::debug!(
        "resolved line {origin_line}: emit after line {emission_line} with indent {indent:?}"
    );
    InsertionPoint::new(origin_line, emission_line, indent, had_block)
}

/// The call line itself is not part of the body for indentation purposes.
fn exclude_origin_line(body: Span, origin_line: usize) -> Option<Span> {
    if body.min != origin_line {
        return Some(body);
    }
    if body.max == origin_line {
        None
    } else {
        Some(Span::new(origin_line + 1, body.max))
    }
}

/// A body reaching the node's own closing line ends just above it. Closing
/// lines of nested constructs stay: values belong after them. A body made of
/// nothing but closing lines is no body at all.
fn drop_own_closing_line(lines: &LineStore, body: Span, node_end: usize) -> Option<Span> {
    let closes = |n: usize| lines.line(n).is_some_and(is_closing_delimiter);
    if body.lines().all(closes) {
        return None;
    }
    if body.max == node_end && closes(body.max) {
        Some(Span::new(body.min, body.max - 1))
    } else {
        Some(body)
    }
}

/// The shallowest indentation among the non-blank lines of `range`.
///
/// Width counts a tab as `tabstop` columns and anything else as one. Ties go
/// to the indentation that appears first. Returns `None` when every line in
/// the range is blank.
pub fn guess_indent(lines: &LineStore, range: Span, tabstop: usize) -> Option<String> {
    let width = |indent: &str| -> usize {
        indent
            .chars()
            .map(|c| if c == '\t' { tabstop } else { 1 })
            .sum()
    };

    let mut best: Option<&str> = None;
    for indent in lines.indent_candidates(range.lines()) {
        match best {
            Some(current) if width(current) <= width(indent) => {}
            _ => best = Some(indent),
        }
    }
    best.map(str::to_string)
}

/// Whether `line` consists of nothing but a block's closing brace, possibly
/// followed by the closers and punctuation of the enclosing call (`}`,
/// `})`, `});`, `})?;`, `},`).
pub fn is_closing_delimiter(line: &str) -> bool {
    static CLOSING: OnceLock<Regex> = OnceLock::new();
    let re = CLOSING.get_or_init(|| {
        Regex::new(r"^\s*\}[)\]}]*\??[;,]?\s*$").expect("closing delimiter regex is valid")
    });
    re.is_match(line)
}
