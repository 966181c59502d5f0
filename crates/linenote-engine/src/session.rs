use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use linenote_syntax::{RustSpanParser, SpanParser};

use crate::emit::{DirectoryEmitter, DirectoryReport, Emitter, StreamEmitter, StringEmitter};
use crate::error::{Error, Result};
use crate::io;
use crate::options::{Options, OptionsPatch};
use crate::source::{SourceFile, SourceId};
use crate::value::{Recordable, Value};

/// A recording session: the files values were recorded in, and the options
/// used to place and print them.
///
/// Files are kept in the order they were first recorded into (or
/// registered), which is also the order they are emitted in.
pub struct Session {
    options: Options,
    files: IndexMap<SourceId, SourceFile>,
    /// Caller-reported file names already resolved to a path on disk.
    located: HashMap<String, SourceId>,
    parser: Arc<dyn SpanParser + Send + Sync>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            files: IndexMap::new(),
            located: HashMap::new(),
            parser: Arc::new(RustSpanParser),
        }
    }

    /// Use `parser` for files registered from now on.
    pub fn with_parser(mut self, parser: impl SpanParser + Send + Sync + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Merge `patch` into the current options. Recorded values are kept.
    pub fn set_options(&mut self, patch: OptionsPatch) -> &mut Self {
        self.options.merge(patch);
        self
    }

    /// Forget every recorded file. Options are kept.
    pub fn reset(&mut self) -> &mut Self {
        self.files.clear();
        self.located.clear();
        self
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.values()
    }

    pub fn file(&self, id: &SourceId) -> Option<&SourceFile> {
        self.files.get(id)
    }

    /// Register an in-memory snippet as a file of its own.
    ///
    /// The identity combines a hash of `src` with `label`, so the same text
    /// registered under different labels does not collide. Registering the
    /// same text and label again returns the existing identity.
    pub fn register_virtual(&mut self, src: &str, label: &str) -> Result<SourceId> {
        if label.is_empty() {
            return Err(Error::InvalidArgument(
                "virtual source label must not be empty".to_string(),
            ));
        }
        let id = SourceId::virtual_source(src, label);
        if let Entry::Vacant(entry) = self.files.entry(id.clone()) {
            entry.insert(SourceFile::new(id.clone(), src, self.parser.as_ref())?);
        }
        Ok(id)
    }

    /// [`Self::register_virtual`] labelled `"<file name>:<line>"` after the
    /// caller.
    #[track_caller]
    pub fn virtual_source(&mut self, src: &str) -> Result<SourceId> {
        let caller = Location::caller();
        let file = Path::new(caller.file())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.register_virtual(src, &format!("{file}:{}", caller.line()))
    }

    /// Record `value` at `line` of source `id`.
    ///
    /// A path source is read and parsed on its first recording. A virtual
    /// source must have been registered first.
    pub fn record(&mut self, id: &SourceId, line: usize, value: Value, had_block: bool) -> Result<()> {
        let file = match self.files.entry(id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let file = match id {
                    SourceId::Path(path) => {
                        SourceFile::from_path(path.clone(), self.parser.as_ref())?
                    }
                    SourceId::Virtual { .. } => {
                        return Err(Error::InvalidArgument(format!(
                            "virtual source {id} was never registered"
                        )));
                    }
                };
                entry.insert(file)
            }
        };
        file.record(line, value, had_block, &self.options)
    }

    /// Record `value` at a caller location as reported by `#[track_caller]`.
    pub fn record_at(&mut self, location: &Location<'_>, value: Value, had_block: bool) -> Result<()> {
        let id = self.locate(location.file())?;
        self.record(&id, location.line() as usize, value, had_block)
    }

    fn locate(&mut self, reported: &str) -> Result<SourceId> {
        if let Some(id) = self.located.get(reported) {
            return Ok(id.clone());
        }
        let path: PathBuf = io::locate_from_cwd(Path::new(reported))?;
        let id = SourceId::Path(path);
        self.located.insert(reported.to_string(), id.clone());
        Ok(id)
    }

    /// Record `value` at the calling line and hand it back.
    #[track_caller]
    pub fn show<T: Recordable + Clone>(&mut self, value: T) -> T {
        let location = Location::caller();
        self.record_or_warn(location, Value::new(value.clone()), false);
        value
    }

    /// Run `f`, record its result at the calling line and hand it back.
    ///
    /// Placement follows the closure body rather than the call line.
    #[track_caller]
    pub fn show_with<T, F>(&mut self, f: F) -> T
    where
        T: Recordable + Clone,
        F: FnOnce() -> T,
    {
        let location = Location::caller();
        let value = f();
        self.record_or_warn(location, Value::new(value.clone()), true);
        value
    }

    /// Mark the calling line as reached, recording `()`.
    #[track_caller]
    pub fn mark(&mut self) {
        let location = Location::caller();
        self.record_or_warn(location, Value::nothing(), false);
    }

    fn record_or_warn(&mut self, location: &Location<'_>, value: Value, had_block: bool) {
        if let Err(e) = self.record_at(location, value, had_block) {
            log::warn!("linenote: could not record at {location}: {e}");
        }
    }

    /// Run `emitter` over every recorded file.
    pub fn execute_emitter<E: Emitter>(&self, emitter: Option<E>) -> Result<E::Output> {
        let mut emitter = emitter.ok_or(Error::NoSinkConfigured)?;
        let files: Vec<&SourceFile> = self.files.values().collect();
        emitter.execute(&files, &self.options)
    }

    /// Write every file, with headers, into `out`.
    pub fn emit<W: Write>(&self, out: W) -> Result<()> {
        self.execute_emitter(Some(StreamEmitter::new(out)))
    }

    /// Write one annotated file per source file into `dir`.
    pub fn emit_to_directory(&self, dir: impl Into<PathBuf>) -> Result<DirectoryReport> {
        self.execute_emitter(Some(DirectoryEmitter::new(dir)))
    }

    /// Render every file into a string keyed by its identity.
    pub fn emit_to_strings(&self) -> Result<IndexMap<SourceId, String>> {
        self.execute_emitter(Some(StringEmitter::new()))
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.options)
            .field("files", &self.files.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::StringEmitter;
    use crate::value::Inspect;
    use pretty_assertions::assert_eq;

    #[test]
    fn execute_emitter_without_emitter_fails() {
        let session = Session::new();
        let result = session.execute_emitter::<StringEmitter>(None);
        assert!(matches!(result, Err(Error::NoSinkConfigured)));
    }

    #[test]
    fn closure_emitters_receive_every_file() {
        let mut session = Session::new();
        session.register_virtual("show(1);\n", "one").unwrap();
        session.register_virtual("show(2);\n", "two").unwrap();

        let names = session
            .execute_emitter(Some(|files: &[&SourceFile], _: &Options| {
                Ok(files.iter().map(|f| f.id().base_name()).collect::<Vec<_>>())
            }))
            .unwrap();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn unregistered_virtual_source_is_rejected() {
        let mut session = Session::new();
        let id = SourceId::virtual_source("show(1);\n", "ghost");
        let err = session.record(&id, 1, Value::new(1), false).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn empty_label_is_rejected() {
        let mut session = Session::new();
        assert!(matches!(
            session.register_virtual("x", ""),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn registering_twice_keeps_recorded_values() {
        let mut session = Session::new();
        let id = session.register_virtual("show(1);\n", "snippet").unwrap();
        session.record(&id, 1, Value::new(1), false).unwrap();
        let again = session.register_virtual("show(1);\n", "snippet").unwrap();

        assert_eq!(id, again);
        assert_eq!(session.files().count(), 1);
        assert_eq!(session.file(&id).unwrap().insertion_points().len(), 1);
    }

    #[test]
    fn virtual_source_label_names_the_caller() {
        let mut session = Session::new();
        let id = session.virtual_source("show(1);\n").unwrap();
        let line = line!() - 1;
        match id {
            SourceId::Virtual { label, .. } => assert_eq!(label, format!("session.rs:{line}")),
            SourceId::Path(_) => panic!("expected a virtual source"),
        }
    }

    #[test]
    fn missing_path_source_is_an_io_error() {
        let mut session = Session::new();
        let id = SourceId::path("/no/such/dir/main.rs");
        let err = session.record(&id, 1, Value::new(1), false).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(session.files().count(), 0);
    }

    #[test]
    fn set_options_keeps_records_and_reset_keeps_options() {
        let mut session = Session::new();
        let id = session.register_virtual("show(1);\n", "s").unwrap();
        session.record(&id, 1, Value::new(1), false).unwrap();

        session.set_options(OptionsPatch::new().inspect(Inspect::Debug));
        assert_eq!(session.files().count(), 1);

        session.reset();
        assert_eq!(session.files().count(), 0);
        assert!(matches!(session.options().inspect, Inspect::Debug));
    }
}
