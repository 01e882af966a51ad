//! Script output writer with explicit indentation state.
//!
//! The writer is a value threaded through the render pass; it owns the sink
//! for the duration of one run and tracks line starts so indentation is
//! applied exactly once per line.

use std::io::Write;

use crate::error::Result;

const INDENT: &str = "    ";

/// Append-only character sink with indentation tracking.
pub struct ScriptWriter<W: Write> {
    out: W,
    indent: usize,
    at_line_start: bool,
}

impl<W: Write> ScriptWriter<W> {
    /// Wrap a sink.
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent: 0,
            at_line_start: true,
        }
    }

    /// Increase the indentation level for subsequent lines.
    pub fn push_indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease the indentation level.
    pub fn pop_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write text, indenting if at the start of a line.
    pub fn write(&mut self, text: &str) -> Result<()> {
        if self.at_line_start && !text.is_empty() {
            for _ in 0..self.indent {
                self.out.write_all(INDENT.as_bytes())?;
            }
            self.at_line_start = false;
        }
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Write a full line followed by a newline.
    pub fn line(&mut self, text: &str) -> Result<()> {
        self.write(text)?;
        self.newline()
    }

    /// Terminate the current line.
    pub fn newline(&mut self) -> Result<()> {
        self.out.write_all(b"\n")?;
        self.at_line_start = true;
        Ok(())
    }

    /// Write an empty separator line.
    pub fn blank(&mut self) -> Result<()> {
        self.newline()
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Release the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}
