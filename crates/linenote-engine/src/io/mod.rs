use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Source file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl IoError {
    fn at(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| IoError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Find the file a caller location refers to.
///
/// Absolute paths are taken as they are. Relative paths are tried against
/// `base` and then each of its ancestors: cargo reports call sites relative to
/// the workspace root, while tests and binaries often run from a package
/// directory below it.
pub fn locate_source(reported: &Path, base: &Path) -> Result<PathBuf, IoError> {
    if reported.is_absolute() {
        return if reported.is_file() {
            Ok(reported.to_path_buf())
        } else {
            Err(IoError::NotFound(reported.to_path_buf()))
        };
    }

    base.ancestors()
        .map(|dir| dir.join(reported))
        .find(|candidate| candidate.is_file())
        .map(|found| fs::canonicalize(&found).unwrap_or(found))
        .ok_or_else(|| IoError::NotFound(reported.to_path_buf()))
}

/// Like [`locate_source`], relative to the current working directory.
pub fn locate_from_cwd(reported: &Path) -> Result<PathBuf, IoError> {
    let cwd = std::env::current_dir().map_err(IoError::at(Path::new(".")))?;
    locate_source(reported, &cwd)
}

/// Read a source file as text.
pub fn read_source(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::at(path))
}

/// Create the output directory and any missing parents.
pub fn create_output_dir(dir: &Path) -> Result<(), IoError> {
    fs::create_dir_all(dir).map_err(IoError::at(dir))
}

/// Create (or truncate) an output file.
pub fn create_output_file(path: &Path) -> Result<fs::File, IoError> {
    fs::File::create(path).map_err(IoError::at(path))
}

/// Pick an output path for `base_name` inside `dir` that has not been
/// handed out yet in this run, appending `.1`, `.2`, ... on collision.
pub fn unique_output_path(dir: &Path, base_name: &str, taken: &HashSet<PathBuf>) -> PathBuf {
    let first = dir.join(base_name);
    if !taken.contains(&first) {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("{base_name}.{n}")))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn locate_walks_up_to_the_workspace_root() {
        let root = TempDir::new().unwrap();
        let package = root.path().join("crates/demo");
        fs::create_dir_all(&package).unwrap();
        fs::create_dir_all(root.path().join("crates/demo/src")).unwrap();
        fs::write(root.path().join("crates/demo/src/lib.rs"), "show(1);\n").unwrap();

        let found = locate_source(Path::new("crates/demo/src/lib.rs"), &package).unwrap();
        assert!(found.ends_with("crates/demo/src/lib.rs"));
    }

    #[test]
    fn locate_reports_missing_files() {
        let root = TempDir::new().unwrap();
        let err = locate_source(Path::new("no/such/file.rs"), root.path()).unwrap_err();
        assert!(matches!(err, IoError::NotFound(_)));
    }

    #[test]
    fn read_missing_source_is_not_found() {
        let err = read_source(Path::new("/this/path/does/not/exist.rs")).unwrap_err();
        assert!(matches!(err, IoError::NotFound(_)));
    }

    #[test]
    fn unique_output_path_appends_counters() {
        let dir = Path::new("/out");
        let mut taken = HashSet::new();

        let first = unique_output_path(dir, "main.rs", &taken);
        assert_eq!(first, PathBuf::from("/out/main.rs"));
        taken.insert(first);

        let second = unique_output_path(dir, "main.rs", &taken);
        assert_eq!(second, PathBuf::from("/out/main.rs.1"));
        taken.insert(second);

        assert_eq!(
            unique_output_path(dir, "main.rs", &taken),
            PathBuf::from("/out/main.rs.2")
        );
    }
}
