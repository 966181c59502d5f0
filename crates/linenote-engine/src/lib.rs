//! # linenote
//!
//! Record values while a program runs, then replay its source files with
//! those values written in as comments next to the lines that produced them.
//!
//! ```no_run
//! use linenote::show;
//!
//! let total: i32 = (1..=3).map(|n| show!(n * n)).sum();
//! show!(total);
//! linenote::global::emit().unwrap();
//! ```
//!
//! prints the file back with a `// 1`, `// 4`, `// 9` block after the
//! closure line and `// 14` after the last one.
//!
//! Placement works on line spans from `linenote-syntax`: a value recorded on
//! a multi-line call lands after the call's last line, and one recorded
//! through [`global::show_with`] lands inside the closure body, indented
//! like it.

pub mod emit;
pub mod error;
pub mod global;
pub mod io;
pub mod options;
pub mod points;
pub mod session;
pub mod source;
pub mod value;

pub use emit::{DirectoryEmitter, DirectoryReport, Emitter, StreamEmitter, StringEmitter};
pub use error::{Error, Result};
pub use global::{mark, show, show_with};
pub use options::{Options, OptionsPatch};
pub use points::{InsertionPoint, InsertionPointSet};
pub use session::Session;
pub use source::{LineStore, SourceFile, SourceId};
pub use value::{Inspect, Recordable, Value};

/// Record values on the default session.
///
/// `show!()` marks the line, `show!(v)` records and returns `v`, and
/// `show!(a, b, ..)` records and returns the tuple `(a, b, ..)`.
#[macro_export]
macro_rules! show {
    () => {
        $crate::global::mark()
    };
    ($value:expr $(,)?) => {
        $crate::global::show($value)
    };
    ($($value:expr),+ $(,)?) => {
        $crate::global::show(($($value),+))
    };
}
