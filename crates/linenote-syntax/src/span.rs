/// An inclusive range of 1-based source lines `[min, max]`.
///
/// Every call-like and block-like node carries one. Unlike byte spans, both
/// ends are inclusive because callers ask "which lines does this node touch".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// First line covered.
    pub min: usize,
    /// Last line covered.
    pub max: usize,
}

impl Span {
    /// Builds a span, swapping the ends if they arrive reversed.
    #[must_use]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A span covering exactly one line.
    #[must_use]
    pub fn line(line: usize) -> Self {
        Self {
            min: line,
            max: line,
        }
    }

    /// Returns true if `line` falls inside the span.
    #[must_use]
    pub fn contains(self, line: usize) -> bool {
        self.min <= line && line <= self.max
    }

    /// Number of lines covered.
    #[must_use]
    pub fn len(self) -> usize {
        self.max - self.min + 1
    }

    /// Always false: a span covers at least one line.
    #[must_use]
    pub fn is_empty(self) -> bool {
        false
    }

    pub fn lines(self) -> std::ops::RangeInclusive<usize> {
        self.min..=self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_reversed_ends() {
        assert_eq!(Span::new(7, 3), Span { min: 3, max: 7 });
    }

    #[test]
    fn contains_is_inclusive() {
        let span = Span::new(2, 4);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(span.contains(4));
        assert!(!span.contains(5));
        assert_eq!(span.len(), 3);
    }
}
