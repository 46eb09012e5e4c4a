/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Sink trait and implementations for serialized sequences.
//!
//! A sink is an append-only destination for serialized sequence lines,
//! one line per subject. Batch writers only talk to the [`SequenceSink`]
//! trait, so the same code feeds an in-memory buffer, a file, or stdout.

use super::error::BatchError;
use std::io::Write;

/// Append-only destination for serialized sequence lines.
///
/// Implementations must preserve append order. Lines never contain a line
/// terminator; sinks that write text add their own.
pub trait SequenceSink {
    /// Appends one serialized sequence.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Io`] if the line cannot be stored.
    fn append(&mut self, line: &str) -> Result<(), BatchError>;

    /// Returns the number of lines appended so far.
    #[must_use]
    fn len(&self) -> usize;

    /// Returns `true` if no lines have been appended.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pushes buffered lines to the underlying storage.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::Io`] if flushing fails.
    fn flush(&mut self) -> Result<(), BatchError> {
        Ok(())
    }
}

/// In-memory implementation of [`SequenceSink`].
///
/// Stores every line in a `Vec` in append order.
///
/// # Examples
///
/// ```
/// use temporal_sequencer::{InMemorySink, SequenceSink};
///
/// let mut sink = InMemorySink::new();
/// assert!(sink.is_empty());
/// sink.append("{}\t").ok();
/// assert_eq!(sink.len(), 1);
/// assert_eq!(sink.to_text(), "{}\t\n");
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemorySink {
    lines: Vec<String>,
}

impl InMemorySink {
    /// Creates a new empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Creates a new sink with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity),
        }
    }

    /// Returns a slice of all stored lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Joins the stored lines into newline-terminated text.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines.iter().map(|l| format!("{l}\n")).collect()
    }
}

impl SequenceSink for InMemorySink {
    fn append(&mut self, line: &str) -> Result<(), BatchError> {
        self.lines.push(line.to_string());
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Writes each line followed by `\n` into any [`Write`] implementation.
///
/// Wrap files in a [`std::io::BufWriter`] and call
/// [`flush`](SequenceSink::flush) when done.
#[derive(Debug)]
pub struct LineWriterSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> LineWriterSink<W> {
    /// Creates a sink that writes into `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SequenceSink for LineWriterSink<W> {
    fn append(&mut self, line: &str) -> Result<(), BatchError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.written
    }

    fn flush(&mut self) -> Result<(), BatchError> {
        self.writer.flush()?;
        Ok(())
    }
}
