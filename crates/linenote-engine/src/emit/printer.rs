use std::io::{self, Write};

use crate::value::{Inspect, Value};

/// Marker that turns an emitted line into a comment.
pub const COMMENT_MARKER: &str = "//";

/// Line-oriented writer that counts what it has written.
pub struct Printer<'w> {
    out: &'w mut dyn Write,
    inspect: Inspect,
    output_lines: usize,
    indent: String,
}

impl<'w> Printer<'w> {
    pub fn new(out: &'w mut dyn Write, inspect: Inspect) -> Self {
        Self {
            out,
            inspect,
            output_lines: 0,
            indent: String::new(),
        }
    }

    /// Number the next written line will have.
    pub fn lineno(&self) -> usize {
        self.output_lines + 1
    }

    /// Lines written so far.
    pub fn output_lines(&self) -> usize {
        self.output_lines
    }

    pub fn indent(&self) -> &str {
        &self.indent
    }

    pub fn set_indent(&mut self, indent: &str) {
        self.indent.clear();
        self.indent.push_str(indent);
    }

    /// Turn a value into text with the configured renderer.
    pub fn render(&self, value: &Value) -> String {
        self.inspect.render(value)
    }

    /// Render `value` and write it as a comment block.
    pub fn print_value(&mut self, value: &Value) -> io::Result<()> {
        let text = self.render(value);
        self.print_rendered(&text)
    }

    /// Write every line of `text` as `indent + "// " + line`. Empty text
    /// writes nothing.
    pub fn print_rendered(&mut self, text: &str) -> io::Result<()> {
        for line in text.lines() {
            if line.is_empty() {
                self.print_blank_annotation()?;
            } else {
                writeln!(self.out, "{}{COMMENT_MARKER} {line}", self.indent)?;
                self.output_lines += 1;
            }
        }
        Ok(())
    }

    /// Write an empty comment line.
    pub fn print_blank_annotation(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}{COMMENT_MARKER}", self.indent)?;
        self.output_lines += 1;
        Ok(())
    }

    /// Write source text verbatim, terminating an unterminated last line.
    pub fn print_raw(&mut self, text: &str) -> io::Result<()> {
        for line in text.split_inclusive('\n') {
            self.out.write_all(line.as_bytes())?;
            if !line.ends_with('\n') {
                self.out.write_all(b"\n")?;
            }
            self.output_lines += 1;
        }
        Ok(())
    }
}
