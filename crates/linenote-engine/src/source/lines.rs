use std::ops::RangeInclusive;

use xi_rope::Rope;

/// The lines of one source file, addressed by 1-based line number.
///
/// Slot 0 is an empty placeholder so a line number indexes the vector
/// directly. Each stored line keeps its own terminator (if it had one), so
/// writing the lines back out in order reproduces the original text.
#[derive(Debug, Clone)]
pub struct LineStore {
    lines: Vec<String>,
}

impl LineStore {
    /// Split `text` into lines, preserving line terminators.
    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from(text);
        let mut lines = vec![String::new()];
        lines.extend(rope.lines_raw(..).map(|line| line.into_owned()));
        Self { lines }
    }

    /// All lines, with the unused slot 0 first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The text of line `n`, terminator included.
    pub fn line(&self, n: usize) -> Option<&str> {
        if n == 0 {
            return None;
        }
        self.lines.get(n).map(String::as_str)
    }

    /// Number of the last line (0 for empty text).
    pub fn len(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `(line_number, text)` pairs from line 1.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .skip(1)
            .map(|(n, line)| (n, line.as_str()))
    }

    /// Leading spaces and tabs of line `n`; empty when the line is missing.
    pub fn indent_of(&self, n: usize) -> &str {
        self.line(n).map(leading_whitespace).unwrap_or("")
    }

    /// Leading whitespace of every non-blank line in `range`, in line order.
    pub fn indent_candidates(&self, range: RangeInclusive<usize>) -> Vec<&str> {
        range
            .filter_map(|n| self.line(n))
            .filter(|line| !line.trim().is_empty())
            .map(leading_whitespace)
            .collect()
    }
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lines_are_one_indexed() {
        let store = LineStore::from_text("first\nsecond");
        assert_eq!(store.len(), 2);
        assert_eq!(store.lines()[0], "");
        assert_eq!(store.line(1), Some("first\n"));
        assert_eq!(store.line(2), Some("second"));
        assert_eq!(store.line(0), None);
        assert_eq!(store.line(3), None);
    }

    #[test]
    fn concatenated_lines_reproduce_text() {
        let text = "fn main() {\r\n    let x = 1;\n\n}\n";
        let store = LineStore::from_text(text);
        assert_eq!(store.lines().concat(), text);
    }

    #[test]
    fn empty_text_has_no_lines() {
        let store = LineStore::from_text("");
        assert!(store.is_empty());
        assert_eq!(store.numbered().count(), 0);
    }

    #[test]
    fn indent_of_returns_leading_spaces_and_tabs() {
        let store = LineStore::from_text("none\n    four\n\t\ttabs\n \t mixed\n");
        assert_eq!(store.indent_of(1), "");
        assert_eq!(store.indent_of(2), "    ");
        assert_eq!(store.indent_of(3), "\t\t");
        assert_eq!(store.indent_of(4), " \t ");
        assert_eq!(store.indent_of(99), "");
    }

    #[test]
    fn indent_candidates_skip_blank_lines() {
        let store = LineStore::from_text("a\n    b\n\n   \n  c\n");
        assert_eq!(store.indent_candidates(1..=5), vec!["", "    ", "  "]);
        assert_eq!(store.indent_candidates(3..=4), Vec::<&str>::new());
    }

    #[test]
    fn indent_candidates_clip_out_of_range_lines() {
        let store = LineStore::from_text("  a\n");
        assert_eq!(store.indent_candidates(0..=10), vec!["  "]);
    }
}
