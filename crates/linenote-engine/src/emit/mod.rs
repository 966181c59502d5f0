//! Replaying recorded files with their values written in as comments.
//!
//! [`emit_source_file`] does the work for one file; the [`Emitter`]
//! implementations decide where each file's output goes:
//!
//! - [`StreamEmitter`]: every file into one writer, separated by headers.
//! - [`DirectoryEmitter`]: one output file per source file.
//! - [`StringEmitter`]: one `String` per source file.
//!
//! Any `FnMut(&[&SourceFile], &Options) -> Result<T>` closure is an emitter too.

pub mod printer;
pub mod sinks;

pub use printer::{COMMENT_MARKER, Printer};
pub use sinks::{DirectoryEmitter, DirectoryReport, StreamEmitter, StringEmitter};

use std::io::{self, Write};

use crate::error::Result;
use crate::options::Options;
use crate::points::InsertionPoint;
use crate::source::SourceFile;

/// Writes the output for a set of recorded files somewhere.
pub trait Emitter {
    type Output;

    fn execute(&mut self, files: &[&SourceFile], options: &Options) -> Result<Self::Output>;
}

impl<T, F> Emitter for F
where
    F: FnMut(&[&SourceFile], &Options) -> Result<T>,
{
    type Output = T;

    fn execute(&mut self, files: &[&SourceFile], options: &Options) -> Result<T> {
        self(files, options)
    }
}

/// Replay `file` line by line into `out`, writing each insertion point's
/// values after its emission line.
///
/// In compact mode only lines inside some point's coverage (origin line
/// through emission line) are written; the value blocks always are.
pub fn emit_source_file(file: &SourceFile, out: &mut dyn Write, options: &Options) -> io::Result<()> {
    let points = file.insertion_points();
    let lines = file.lines();
    let compact_ranges = points.compact_ranges();
    // Source line number -> output line number it was (or would have been) written at.
    let mut line_map = vec![0usize; lines.len() + 1];
    let mut printer = Printer::new(out, options.inspect.clone());

    for (n, line) in lines.numbered() {
        line_map[n] = printer.lineno();
        if !options.compact || compact_ranges.iter().any(|r| r.contains(&n)) {
            printer.print_raw(line)?;
        } else {
            log::trace!("compact: skipping line {n}");
        }

        for point in points.by_emission_line(n) {
            printer.set_indent(&point.indent);
            if options.annotate {
                let output_line = line_map.get(point.origin_line).copied().filter(|&l| l > 0);
                printer.print_rendered(&annotation(point, output_line))?;
            }
            for value in point.values() {
                printer.print_value(value)?;
            }
        }
    }
    Ok(())
}

fn annotation(point: &InsertionPoint, output_line: Option<usize>) -> String {
    let mut note = format!(
        "linenote showing {} values for line {}",
        point.values().len(),
        point.origin_line
    );
    if let Some(line) = output_line {
        note.push_str(&format!(" (line {line} in this output)"));
    }
    note
}
