use std::fmt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Prefix shared by the display form of every virtual source.
pub const VIRTUAL_PREFIX: &str = "(linenote eval)/";

/// Identity of a recorded source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    /// A real file on disk, by absolute path.
    Path(PathBuf),
    /// An in-memory snippet, keyed by the SHA-256 of its text and a label
    /// chosen by whoever registered it.
    Virtual { digest: String, label: String },
}

impl SourceId {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Identity for snippet `src` registered under `label`.
    ///
    /// The same text registered from two places gets two identities as long
    /// as the labels differ; the same text and label always map to one.
    pub fn virtual_source(src: &str, label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(src.as_bytes());
        Self::Virtual {
            digest: format!("{:x}", hasher.finalize()),
            label: label.to_string(),
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual { .. })
    }

    /// File name used when this source is written to an output directory.
    pub fn base_name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "source".to_string()),
            Self::Virtual { label, .. } => Path::new(label)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "eval".to_string()),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Virtual { digest, label } => write!(f, "{VIRTUAL_PREFIX}{digest}/{label}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_identity_depends_on_text_and_label() {
        let a = SourceId::virtual_source("show(1);", "a.rs:1");
        let b = SourceId::virtual_source("show(1);", "a.rs:1");
        let c = SourceId::virtual_source("show(1);", "a.rs:9");
        let d = SourceId::virtual_source("show(2);", "a.rs:1");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn virtual_display_carries_digest_and_label() {
        let id = SourceId::virtual_source("", "snippet");
        // SHA-256 of the empty string.
        assert_eq!(
            id.to_string(),
            "(linenote eval)/e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855/snippet"
        );
    }

    #[test]
    fn base_name_uses_last_path_component() {
        assert_eq!(SourceId::path("/src/app/main.rs").base_name(), "main.rs");
        assert_eq!(
            SourceId::virtual_source("x", "tests/demo.rs:12").base_name(),
            "demo.rs:12"
        );
    }
}
