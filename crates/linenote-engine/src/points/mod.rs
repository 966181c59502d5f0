//! Insertion points: where recorded values are written back into a file.
//!
//! - [`resolve`] computes one [`InsertionPoint`] for a call site from the
//!   file's lines and span index.
//! - [`set`] keeps the points of one file, looked up by origin line while
//!   recording and by emission line while emitting.

pub mod resolve;
pub mod set;

pub use resolve::{guess_indent, is_closing_delimiter, resolve};
pub use set::InsertionPointSet;

use crate::value::Value;

/// The resolved output location for one origin line, plus every value
/// recorded there.
#[derive(Debug)]
pub struct InsertionPoint {
    /// Line the recording call starts on.
    pub origin_line: usize,
    /// Line after which the values are written.
    pub emission_line: usize,
    /// Whitespace put in front of every emitted comment line.
    pub indent: String,
    /// Whether the recording call carried a block.
    pub had_block: bool,
    values: Vec<Value>,
}

impl InsertionPoint {
    pub fn new(origin_line: usize, emission_line: usize, indent: String, had_block: bool) -> Self {
        Self {
            origin_line,
            emission_line,
            indent,
            had_block,
            values: Vec::new(),
        }
    }

    /// Append a value; values are kept in recording order.
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Lines from the call through the emission point, whichever comes first.
    pub fn coverage(&self) -> std::ops::RangeInclusive<usize> {
        let lo = self.origin_line.min(self.emission_line);
        let hi = self.origin_line.max(self.emission_line);
        lo..=hi
    }
}
