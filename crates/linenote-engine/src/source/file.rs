use std::fmt;
use std::path::PathBuf;

use linenote_syntax::{SpanIndex, SpanParser};

use super::{LineStore, SourceId};
use crate::error::{Error, Result};
use crate::io;
use crate::options::Options;
use crate::points::{InsertionPointSet, resolve};
use crate::value::Value;

/// One recorded file: its text, its spans and the points recorded in it.
pub struct SourceFile {
    id: SourceId,
    lines: LineStore,
    spans: Box<dyn SpanIndex + Send + Sync>,
    points: InsertionPointSet,
}

impl SourceFile {
    /// Build a record from text already in memory.
    pub fn new(id: SourceId, text: &str, parser: &dyn SpanParser) -> Result<Self> {
        let spans = parser.parse(text).map_err(|source| Error::ParseFailure {
            source_id: id.clone(),
            source,
        })?;
        log::debug!("registered source {id}");
        Ok(Self {
            id,
            lines: LineStore::from_text(text),
            spans,
            points: InsertionPointSet::new(),
        })
    }

    /// Read and parse a file on disk.
    pub fn from_path(path: PathBuf, parser: &dyn SpanParser) -> Result<Self> {
        let text = io::read_source(&path)?;
        Self::new(SourceId::Path(path), &text, parser)
    }

    pub fn id(&self) -> &SourceId {
        &self.id
    }

    pub fn lines(&self) -> &LineStore {
        &self.lines
    }

    pub fn insertion_points(&self) -> &InsertionPointSet {
        &self.points
    }

    /// Fold one recorded value into the point for `origin_line`, resolving
    /// the point the first time the line is seen.
    pub fn record(
        &mut self,
        origin_line: usize,
        value: Value,
        had_block: bool,
        options: &Options,
    ) -> Result<()> {
        if origin_line == 0 || origin_line > self.lines.len() {
            return Err(Error::InvalidArgument(format!(
                "line {origin_line} is outside {} (1..={})",
                self.id,
                self.lines.len()
            )));
        }

        if self.points.by_origin(origin_line).is_none() {
            let point = resolve(
                &self.lines,
                self.spans.as_ref(),
                origin_line,
                had_block,
                options,
            );
            self.points.add(point);
        }
        if let Some(point) = self.points.by_origin_mut(origin_line) {
            point.push(value);
        }
        Ok(())
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("id", &self.id)
            .field("lines", &self.lines.len())
            .field("points", &self.points.len())
            .finish()
    }
}
