use crate::value::Inspect;

/// Settings consulted while resolving insertion points and emitting.
#[derive(Debug, Clone)]
pub struct Options {
    /// Width of a tab when comparing indentation.
    pub tabstop: usize,
    /// One indentation level, used when a deeper indent has to be made up.
    pub default_indent: String,
    /// Emit only the lines covered by insertion points.
    pub compact: bool,
    /// How values are rendered.
    pub inspect: Inspect,
    /// Precede each value block with a note naming its origin line.
    pub annotate: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tabstop: 4,
            default_indent: "    ".to_string(),
            compact: false,
            inspect: Inspect::Pretty,
            annotate: false,
        }
    }
}

impl Options {
    /// Overwrite every field the patch sets.
    pub fn merge(&mut self, patch: OptionsPatch) {
        if let Some(tabstop) = patch.tabstop {
            self.tabstop = tabstop;
        }
        if let Some(default_indent) = patch.default_indent {
            self.default_indent = default_indent;
        }
        if let Some(compact) = patch.compact {
            self.compact = compact;
        }
        if let Some(inspect) = patch.inspect {
            self.inspect = inspect;
        }
        if let Some(annotate) = patch.annotate {
            self.annotate = annotate;
        }
    }
}

/// A partial set of options; unset fields leave the current value alone.
#[derive(Debug, Clone, Default)]
pub struct OptionsPatch {
    pub tabstop: Option<usize>,
    pub default_indent: Option<String>,
    pub compact: Option<bool>,
    pub inspect: Option<Inspect>,
    pub annotate: Option<bool>,
}

impl OptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabstop(mut self, tabstop: usize) -> Self {
        self.tabstop = Some(tabstop);
        self
    }

    pub fn default_indent(mut self, indent: impl Into<String>) -> Self {
        self.default_indent = Some(indent.into());
        self
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = Some(compact);
        self
    }

    pub fn inspect(mut self, inspect: Inspect) -> Self {
        self.inspect = Some(inspect);
        self
    }

    pub fn annotate(mut self, annotate: bool) -> Self {
        self.annotate = Some(annotate);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_only_touches_set_fields() {
        let mut options = Options::default();
        options.merge(OptionsPatch::new().compact(true).default_indent("\t"));

        assert!(options.compact);
        assert_eq!(options.default_indent, "\t");
        assert_eq!(options.tabstop, 4);
        assert!(!options.annotate);
        assert!(matches!(options.inspect, Inspect::Pretty));
    }

    #[test]
    fn later_merges_win() {
        let mut options = Options::default();
        options.merge(OptionsPatch::new().tabstop(2));
        options.merge(OptionsPatch::new().tabstop(8).annotate(true));
        assert_eq!(options.tabstop, 8);
        assert!(options.annotate);
    }
}
