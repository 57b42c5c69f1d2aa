// src/output/annotations.rs

//! Console line transform that duplicates workflow annotations.
//!
//! The wrapped CLI prefixes every log line it relays with a timestamp, e.g.
//!
//! ```text
//! 2024-01-15T10:20:30.123Z: ::warning ::Build took longer than usual
//! ```
//!
//! The host runtime only recognizes `::notice `, `::error ` and `::warning `
//! commands at the very start of a line, so each annotated line is written a
//! second time with the timestamp stripped.

use std::io::{self, Write};

/// Width of the timestamp prefix in front of each relayed line:
/// `2024-01-15T10:20:30.123Z: `.
pub const TIMESTAMP_WIDTH: usize = 26;

pub const ANNOTATION_PREFIXES: [&str; 3] = ["::notice ", "::error ", "::warning "];

/// Line terminator style, remembered from the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSeparator {
    #[default]
    Lf,
    CrLf,
}

impl LineSeparator {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineSeparator::Lf => b"\n",
            LineSeparator::CrLf => b"\r\n",
        }
    }
}

/// If `line` carries an annotation behind its timestamp, return the line
/// without the timestamp.
pub fn extract_annotation(line: &str) -> Option<&str> {
    let (offset, _) = line.char_indices().nth(TIMESTAMP_WIDTH)?;
    let message = &line[offset..];
    ANNOTATION_PREFIXES
        .iter()
        .any(|prefix| message.starts_with(prefix))
        .then_some(message)
}

/// Splits a byte stream into lines and writes them to `out`, duplicating
/// annotation lines.
///
/// Lines end at `\n` or `\r\n`. Once a `\r\n` has been seen, every line
/// written afterwards uses `\r\n`. The separator state belongs to this
/// writer, so each pipeline run starts from `\n`.
pub struct AnnotationWriter<W: Write> {
    out: W,
    pending: Vec<u8>,
    separator: LineSeparator,
}

impl<W: Write> AnnotationWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: Vec::new(),
            separator: LineSeparator::default(),
        }
    }

    pub fn separator(&self) -> LineSeparator {
        self.separator
    }

    /// Feed raw bytes; complete lines are written immediately.
    pub fn push(&mut self, bytes: &[u8]) -> io::Result<()> {
        for &b in bytes {
            if b == b'\n' {
                if self.pending.last() == Some(&b'\r') {
                    self.pending.pop();
                    self.separator = LineSeparator::CrLf;
                }
                let line = std::mem::take(&mut self.pending);
                self.write_line(&line)?;
            } else {
                self.pending.push(b);
            }
        }
        Ok(())
    }

    /// Terminate the partial line, if any, with the current separator.
    ///
    /// Called at the end of a source's output so its last line is never
    /// joined with whatever comes next.
    pub fn end_line(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let line = std::mem::take(&mut self.pending);
        self.write_line(&line)
    }

    /// Write any trailing partial line and flush.
    pub fn finish(&mut self) -> io::Result<()> {
        self.end_line()?;
        self.out.flush()
    }

    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        let sep = self.separator.as_bytes();
        self.out.write_all(line)?;
        self.out.write_all(sep)?;

        let text = String::from_utf8_lossy(line);
        if let Some(annotation) = extract_annotation(&text) {
            self.out.write_all(annotation.as_bytes())?;
            self.out.write_all(sep)?;
        }
        Ok(())
    }
}
