/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Per-subject batch building, writing, and reading.
//!
//! Data-source adapters (database cursors, spreadsheet readers) produce
//! [`SubjectRow`]s. [`group_rows`] turns them into one [`Sequencer`] per
//! subject, [`write_batch`] sends one line per subject to a
//! [`SequenceSink`], and [`read_batch`] reads such a batch back.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use serde_json::json;
//! use temporal_sequencer::sequencer::batch::{group_rows, read_batch, write_batch};
//! use temporal_sequencer::{BatchOptions, InMemorySink, SubjectRow};
//!
//! # fn main() -> Result<(), temporal_sequencer::BatchError> {
//! let ts = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! let rows = vec![
//!     SubjectRow::new(json!(7), ts, "I10, E11"),
//!     SubjectRow::new(json!(8), ts, "J45"),
//! ];
//!
//! let options = BatchOptions::default();
//! let mut sequencers = group_rows(rows, &options)?;
//! let mut sink = InMemorySink::new();
//! assert_eq!(write_batch(&mut sequencers, &mut sink, &options)?, 2);
//!
//! let restored = read_batch(sink.to_text().as_bytes(), options.separator)?;
//! assert_eq!(restored[0].len(), 2);
//! assert_eq!(restored[1].metadata()["subject_id"], json!(8));
//! # Ok(())
//! # }
//! ```

use super::core::Sequencer;
use super::error::{BatchError, SequencerError};
use super::metadata::Metadata;
use super::options::BatchOptions;
use super::sink::SequenceSink;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::BufRead;
use tracing::debug;

/// Delimiter between codes packed into one cell.
pub const CODE_LIST_DELIMITER: char = ',';

/// One source row: a subject, a timestamp, and one or more codes.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRow {
    /// Subject identifier, stored as metadata. Must be a JSON scalar.
    pub subject: Value,

    /// When the coded events happened.
    pub timestamp: NaiveDateTime,

    /// A single code or a comma-separated list of codes.
    pub codes: String,
}

impl SubjectRow {
    /// Creates a new row.
    #[must_use]
    pub fn new(subject: impl Into<Value>, timestamp: NaiveDateTime, codes: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            timestamp,
            codes: codes.into(),
        }
    }

    /// Individual codes in the cell, trimmed, with empty entries dropped.
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.codes
            .split(CODE_LIST_DELIMITER)
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// Groups rows into one sequencer per subject.
///
/// Sequencers come back in the order their subject first appears. Each
/// carries `{subject_key: subject}` as metadata and one record per code.
///
/// # Errors
///
/// - [`SequencerError::InvalidSeparator`] if the options' separator is reserved
/// - [`SequencerError::NonScalarMetadata`] if a subject is an array or object
pub fn group_rows<I>(rows: I, options: &BatchOptions) -> Result<Vec<Sequencer>, SequencerError>
where
    I: IntoIterator<Item = SubjectRow>,
{
    options.validate()?;

    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut sequencers: Vec<Sequencer> = Vec::new();
    let mut row_count = 0usize;

    for row in rows {
        row_count += 1;
        let slot = match slots.entry(row.subject.to_string()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut metadata = Metadata::new();
                metadata.insert(options.subject_key.clone(), row.subject.clone());
                sequencers.push(Sequencer::with_metadata(metadata, options.separator)?);
                *entry.insert(sequencers.len() - 1)
            }
        };

        let sequencer = &mut sequencers[slot];
        for code in row.codes() {
            sequencer.add(row.timestamp, code);
        }
    }

    debug!(
        rows = row_count,
        subjects = sequencers.len(),
        "grouped rows by subject"
    );
    Ok(sequencers)
}

/// Serializes every sequencer and appends one line per subject to `sink`.
///
/// Uses the options' granularity and direction. The sink is flushed once
/// all lines are written. Returns the number of lines written.
///
/// # Errors
///
/// - [`BatchError::Sequencer`] if a sequencer cannot be serialized
/// - [`BatchError::Io`] if the sink fails
pub fn write_batch<'a, I, S>(
    sequencers: I,
    sink: &mut S,
    options: &BatchOptions,
) -> Result<usize, BatchError>
where
    I: IntoIterator<Item = &'a mut Sequencer>,
    S: SequenceSink + ?Sized,
{
    let mut written = 0usize;
    for sequencer in sequencers {
        let line = sequencer.serialize(options.granularity, options.reverse)?;
        sink.append(&line)?;
        written += 1;
    }
    sink.flush()?;

    debug!(
        lines = written,
        granularity = %options.granularity,
        reverse = options.reverse,
        "wrote batch"
    );
    Ok(written)
}

/// Groups `rows` and writes the resulting batch to `sink` in one step.
///
/// # Errors
///
/// Same as [`group_rows`] and [`write_batch`].
pub fn sequence_rows<I, S>(rows: I, sink: &mut S, options: &BatchOptions) -> Result<usize, BatchError>
where
    I: IntoIterator<Item = SubjectRow>,
    S: SequenceSink + ?Sized,
{
    let mut sequencers = group_rows(rows, options)?;
    write_batch(&mut sequencers, sink, options)
}

/// Reads a newline-delimited batch back into sequencers.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// - [`BatchError::Line`] with the one-based line number of the first
///   line that does not parse
/// - [`BatchError::Io`] if reading fails
pub fn read_batch<R: BufRead>(reader: R, separator: char) -> Result<Vec<Sequencer>, BatchError> {
    let mut sequencers = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let sequencer = Sequencer::read(&line, separator).map_err(|source| BatchError::Line {
            line: index + 1,
            source,
        })?;
        sequencers.push(sequencer);
    }

    debug!(subjects = sequencers.len(), "read batch");
    Ok(sequencers)
}
