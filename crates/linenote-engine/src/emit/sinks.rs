use std::collections::HashSet;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::{COMMENT_MARKER, Emitter, emit_source_file};
use crate::error::{Error, Result};
use crate::io::{self as fsio, IoError};
use crate::options::Options;
use crate::source::{SourceFile, SourceId};

const RULE: &str = "--------------------------------";

/// Writes every file into one stream, each preceded by a header naming it.
///
/// The first failure aborts the run: after a partial write the stream is in
/// no state to continue.
pub struct StreamEmitter<W: Write> {
    out: W,
}

impl<W: Write> StreamEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Emitter for StreamEmitter<W> {
    type Output = ();

    fn execute(&mut self, files: &[&SourceFile], options: &Options) -> Result<()> {
        let stream = Path::new("<stream>");
        let at_stream = |source| IoError::Io {
            path: stream.to_path_buf(),
            source,
        };
        for file in files {
            writeln!(self.out, "{COMMENT_MARKER}{RULE}").map_err(at_stream)?;
            writeln!(self.out, "{COMMENT_MARKER}{}", file.id()).map_err(at_stream)?;
            writeln!(self.out, "{COMMENT_MARKER}{RULE}").map_err(at_stream)?;
            emit_source_file(file, &mut self.out, options).map_err(at_stream)?;
        }
        self.out.flush().map_err(at_stream)?;
        Ok(())
    }
}

/// Outcome of a directory run: what was written and what failed.
#[derive(Debug, Default)]
pub struct DirectoryReport {
    pub written: Vec<(SourceId, PathBuf)>,
    pub failed: Vec<(SourceId, Error)>,
}

impl DirectoryReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes one output file per source file into a directory.
///
/// Files are named after the source's base name; a name already used in
/// this run gets `.1`, `.2`, ... appended. A file that fails to write is
/// reported and the remaining files are still written.
pub struct DirectoryEmitter {
    dir: PathBuf,
}

impl DirectoryEmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write_one(&self, file: &SourceFile, path: &Path, options: &Options) -> Result<()> {
        let out = fsio::create_output_file(path)?;
        let mut out = BufWriter::new(out);
        let at_path = |source| IoError::Io {
            path: path.to_path_buf(),
            source,
        };
        emit_source_file(file, &mut out, options).map_err(at_path)?;
        out.flush().map_err(at_path)?;
        Ok(())
    }
}

impl Emitter for DirectoryEmitter {
    type Output = DirectoryReport;

    fn execute(&mut self, files: &[&SourceFile], options: &Options) -> Result<DirectoryReport> {
        fsio::create_output_dir(&self.dir)?;

        let mut taken = HashSet::new();
        let mut report = DirectoryReport::default();
        for file in files {
            let path = fsio::unique_output_path(&self.dir, &file.id().base_name(), &taken);
            taken.insert(path.clone());
            match self.write_one(file, &path, options) {
                Ok(()) => {
                    log::debug!("wrote {} to {}", file.id(), path.display());
                    report.written.push((file.id().clone(), path));
                }
                Err(e) => {
                    log::warn!("failed to write {}: {e}", file.id());
                    report.failed.push((file.id().clone(), e));
                }
            }
        }
        Ok(report)
    }
}

/// Renders every file into a string, keyed by source identity. A failure
/// fails the whole run.
#[derive(Debug, Default)]
pub struct StringEmitter;

impl StringEmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Emitter for StringEmitter {
    type Output = IndexMap<SourceId, String>;

    fn execute(&mut self, files: &[&SourceFile], options: &Options) -> Result<Self::Output> {
        let mut rendered = IndexMap::with_capacity(files.len());
        for file in files {
            let mut buf = Vec::new();
            emit_source_file(file, &mut buf, options).map_err(|source| IoError::Io {
                path: PathBuf::from(file.id().to_string()),
                source,
            })?;
            rendered.insert(
                file.id().clone(),
                String::from_utf8_lossy(&buf).into_owned(),
            );
        }
        Ok(rendered)
    }
}
