//! A process-wide default [`Session`].
//!
//! Everything here forwards to one lazily created session behind a mutex.
//! Recording never panics: failures are logged and the value is handed back
//! unchanged. A poisoned lock is taken over as is.

use std::io;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use indexmap::IndexMap;

use crate::emit::DirectoryReport;
use crate::error::Result;
use crate::options::OptionsPatch;
use crate::session::Session;
use crate::source::SourceId;
use crate::value::{Recordable, Value};

static SESSION: OnceLock<Mutex<Session>> = OnceLock::new();

fn lock() -> MutexGuard<'static, Session> {
    SESSION
        .get_or_init(|| Mutex::new(Session::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Run `f` with the default session locked.
///
/// Do not record through the façade from inside `f`: the lock is held.
pub fn with_session<R>(f: impl FnOnce(&mut Session) -> R) -> R {
    f(&mut lock())
}

fn record(location: &Location<'_>, value: Value, had_block: bool) {
    if let Err(e) = lock().record_at(location, value, had_block) {
        log::warn!("linenote: could not record at {location}: {e}");
    }
}

/// Record `value` at the calling line and hand it back.
#[track_caller]
pub fn show<T: Recordable + Clone>(value: T) -> T {
    let location = Location::caller();
    record(location, Value::new(value.clone()), false);
    value
}

/// Run `f`, then record its result at the calling line.
///
/// `f` runs before the session is locked, so it may record values itself.
#[track_caller]
pub fn show_with<T, F>(f: F) -> T
where
    T: Recordable + Clone,
    F: FnOnce() -> T,
{
    let location = Location::caller();
    let value = f();
    record(location, Value::new(value.clone()), true);
    value
}

/// Mark the calling line as reached.
#[track_caller]
pub fn mark() {
    record(Location::caller(), Value::nothing(), false);
}

pub fn register_virtual(src: &str, label: &str) -> Result<SourceId> {
    lock().register_virtual(src, label)
}

/// Record `value` at `line` of a registered or on-disk source.
pub fn record_at_line(id: &SourceId, line: usize, value: Value, had_block: bool) -> Result<()> {
    lock().record(id, line, value, had_block)
}

pub fn set_options(patch: OptionsPatch) {
    lock().set_options(patch);
}

pub fn reset() {
    lock().reset();
}

/// Write every recorded file to standard output.
pub fn emit() -> Result<()> {
    lock().emit(io::stdout().lock())
}

pub fn emit_to_directory(dir: impl Into<PathBuf>) -> Result<DirectoryReport> {
    lock().emit_to_directory(dir)
}

pub fn emit_to_strings() -> Result<IndexMap<SourceId, String>> {
    lock().emit_to_strings()
}
