/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Core Sequencer implementation.
//!
//! This module provides the [`Sequencer`] struct, which collects
//! [`TemporalRecord`]s, puts them in a canonical chronological order with
//! optional shuffling inside same-period runs, and reads/writes the
//! one-line text form.

use super::error::SequencerError;
use super::granularity::Granularity;
use super::metadata::{self, Metadata};
use super::record::TemporalRecord;
use chrono::NaiveDateTime;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, trace};

/// Default field separator.
pub const DEFAULT_SEPARATOR: char = '\t';

/// Characters that already carry meaning inside a record or a batch line.
const RESERVED_SEPARATORS: &[char] = &[
    '(', ')', ',', ' ', '-', '_', ':', '.', '{', '}', '"', '\n', '\r',
];

/// Capability shared by every coding sequencer.
///
/// A sequencer puts its records into a canonical order and writes them out
/// as text. [`Sequencer`] is the timestamp-based implementation.
pub trait CodeSequencer {
    /// Orders the records, shuffling within runs that share a truncated
    /// timestamp at `granularity`.
    fn sequence(&mut self, granularity: Granularity, reverse: bool);

    /// Orders the records if needed and renders them as one line.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidArgument`](super::ErrorKind) error if
    /// the contents cannot be written without ambiguity.
    fn serialize(&mut self, granularity: Granularity, reverse: bool)
    -> Result<String, SequencerError>;
}

/// Orders an unordered collection of timestamped codes into one sequence.
///
/// Records are sorted by timestamp with a stable sort. With a granularity
/// other than [`Granularity::None`], every maximal run of records sharing
/// the same truncated timestamp is then shuffled uniformly, hiding the
/// order in which same-period events were recorded.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use serde_json::json;
/// use temporal_sequencer::{Granularity, Sequencer};
///
/// # fn main() -> Result<(), temporal_sequencer::SequencerError> {
/// let mut metadata = serde_json::Map::new();
/// metadata.insert("pat_id".to_string(), json!(1));
/// let mut seq = Sequencer::with_metadata(metadata, '\t')?;
/// assert_eq!(seq.serialize(Granularity::Day, false)?, "{\"pat_id\": 1}\t");
///
/// let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// seq.add(day.and_hms_opt(8, 0, 0).unwrap(), "A");
/// assert!(!seq.is_sequenced());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Sequencer {
    /// Flat metadata written ahead of the records.
    metadata: Metadata,

    /// Field separator used by the text form.
    separator: char,

    /// Records in their current order.
    records: Vec<TemporalRecord>,

    /// Granularity of the last sequencing pass.
    shuffle_granularity: Granularity,

    /// Direction of the last sequencing pass.
    reverse: bool,

    /// Whether `records` reflects the last sequencing pass.
    is_sequenced: bool,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    /// Creates an empty sequencer with no metadata and a tab separator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: Metadata::new(),
            separator: DEFAULT_SEPARATOR,
            records: Vec::new(),
            shuffle_granularity: Granularity::None,
            reverse: false,
            is_sequenced: false,
        }
    }

    /// Creates an empty sequencer with the given metadata and separator.
    ///
    /// # Arguments
    ///
    /// * `metadata` - Flat JSON object, e.g. `{"person_id": 123}`
    /// * `separator` - Field delimiter for the text form
    ///
    /// # Errors
    ///
    /// - [`SequencerError::NonScalarMetadata`] if a value is an array or object
    /// - [`SequencerError::InvalidSeparator`] if `separator` is a digit or one
    ///   of `( ) , - _ : . { } "`, a space, or a line break
    pub fn with_metadata(metadata: Metadata, separator: char) -> Result<Self, SequencerError> {
        metadata::validate(&metadata)?;
        validate_separator(separator)?;

        Ok(Self {
            metadata,
            separator,
            ..Self::new()
        })
    }

    /// Appends a record and marks the sequence stale.
    pub fn add(&mut self, timestamp: NaiveDateTime, code: impl Into<String>) {
        self.add_record(TemporalRecord::new(timestamp, code));
    }

    /// Appends an existing record and marks the sequence stale.
    pub fn add_record(&mut self, record: TemporalRecord) {
        self.records.push(record);
        self.is_sequenced = false;
    }

    /// Orders the records using the thread-local RNG.
    ///
    /// See [`sequence_with_rng`](Self::sequence_with_rng).
    pub fn sequence(&mut self, granularity: Granularity, reverse: bool) {
        self.sequence_with_rng(granularity, reverse, &mut rand::thread_rng());
    }

    /// Parses a granularity token and orders the records.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::UnsupportedGranularity`] if `token` is not a
    /// supported level. The records are left untouched in that case.
    pub fn sequence_token(&mut self, token: &str, reverse: bool) -> Result<(), SequencerError> {
        let granularity = token.parse()?;
        self.sequence(granularity, reverse);
        Ok(())
    }

    /// Orders the records, drawing shuffles from `rng`.
    ///
    /// Records are stably sorted by timestamp (descending when `reverse`).
    /// Unless `granularity` is [`Granularity::None`], each maximal run of
    /// records with equal truncated timestamps is then permuted uniformly at
    /// random. Runs keep their sorted order relative to each other.
    pub fn sequence_with_rng<R: Rng + ?Sized>(
        &mut self,
        granularity: Granularity,
        reverse: bool,
        rng: &mut R,
    ) {
        if reverse {
            self.records.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        } else {
            self.records.sort_by_key(TemporalRecord::timestamp);
        }

        let mut runs = 0usize;
        if granularity.shuffles() {
            let same_run = |a: &TemporalRecord, b: &TemporalRecord| {
                granularity.bucket(&a.timestamp()) == granularity.bucket(&b.timestamp())
            };
            for run in self.records.chunk_by_mut(same_run) {
                trace!(len = run.len(), "shuffling run");
                run.shuffle(rng);
                runs += 1;
            }
        }

        self.shuffle_granularity = granularity;
        self.reverse = reverse;
        self.is_sequenced = true;

        debug!(
            records = self.records.len(),
            %granularity,
            reverse,
            runs,
            "sequenced records"
        );
    }

    /// Returns `true` if the current order does not reflect a sequencing
    /// pass with these parameters.
    #[must_use]
    pub fn is_stale(&self, granularity: Granularity, reverse: bool) -> bool {
        !self.is_sequenced || self.shuffle_granularity != granularity || self.reverse != reverse
    }

    /// Renders the sequence as one line using the thread-local RNG.
    ///
    /// See [`serialize_with_rng`](Self::serialize_with_rng).
    ///
    /// # Errors
    ///
    /// Same as [`serialize_with_rng`](Self::serialize_with_rng).
    pub fn serialize(
        &mut self,
        granularity: Granularity,
        reverse: bool,
    ) -> Result<String, SequencerError> {
        self.serialize_with_rng(granularity, reverse, &mut rand::thread_rng())
    }

    /// Renders the sequence as
    /// `<metadata><sep><record 1><sep>...<sep><record N>`.
    ///
    /// The records are re-sequenced first only when the sequencer is stale
    /// for `granularity` and `reverse`; otherwise the current order is kept.
    /// With no records the output is the metadata followed by one separator.
    ///
    /// # Errors
    ///
    /// - [`SequencerError::UnencodableMetadata`] if the rendered metadata
    ///   contains the separator
    /// - [`SequencerError::UnencodableCode`] if a code contains `)`, a line
    ///   break, or the separator
    /// - [`SequencerError::UnencodableTimestamp`] if a timestamp's year is
    ///   outside `0..=9999`
    pub fn serialize_with_rng<R: Rng + ?Sized>(
        &mut self,
        granularity: Granularity,
        reverse: bool,
        rng: &mut R,
    ) -> Result<String, SequencerError> {
        let header = metadata::render(&self.metadata);
        if header.contains(self.separator) {
            return Err(SequencerError::UnencodableMetadata {
                rendered: header,
                separator: self.separator,
            });
        }
        if let Some(record) = self.records.iter().find(|r| !r.is_encodable(self.separator)) {
            return Err(SequencerError::UnencodableCode {
                code: record.code().to_string(),
                separator: self.separator,
            });
        }
        if let Some(record) = self.records.iter().find(|r| !r.has_encodable_timestamp()) {
            return Err(SequencerError::UnencodableTimestamp {
                timestamp: record.timestamp().to_string(),
            });
        }

        if self.is_stale(granularity, reverse) {
            self.sequence_with_rng(granularity, reverse, rng);
        }

        let mut out = header;
        out.push(self.separator);
        let mut sep_buf = [0u8; 4];
        let sep: &str = self.separator.encode_utf8(&mut sep_buf);
        let body: Vec<String> = self.records.iter().map(TemporalRecord::serialize).collect();
        out.push_str(&body.join(sep));
        Ok(out)
    }

    /// Reads a line written by [`serialize`](Self::serialize).
    ///
    /// The result is marked as sequenced, with no shuffle granularity and
    /// ascending direction, and keeps the records in the order they appear.
    ///
    /// # Errors
    ///
    /// - [`SequencerError::InvalidSeparator`] if `separator` is reserved
    /// - [`SequencerError::MalformedMetadata`] if the first field is not a
    ///   flat JSON object
    /// - [`SequencerError::MalformedRecord`] for the first record field that
    ///   does not parse
    pub fn read(text: &str, separator: char) -> Result<Self, SequencerError> {
        validate_separator(separator)?;

        let mut fields = text.split(separator);
        let metadata = metadata::parse(fields.next().unwrap_or_default())?;
        let fields: Vec<&str> = fields.collect();

        let records = match fields.as_slice() {
            [] | [""] => Vec::new(),
            fields => fields
                .iter()
                .enumerate()
                .map(|(index, field)| TemporalRecord::read(field).map_err(|e| e.at_index(index)))
                .collect::<Result<Vec<_>, _>>()?,
        };

        debug!(records = records.len(), "read sequence");

        Ok(Self {
            metadata,
            separator,
            records,
            shuffle_granularity: Granularity::None,
            reverse: false,
            is_sequenced: true,
        })
    }

    /// Records in their current order.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[TemporalRecord] {
        &self.records
    }

    /// Consumes the sequencer and returns its records in their current order.
    #[must_use]
    pub fn into_records(self) -> Vec<TemporalRecord> {
        self.records
    }

    /// Metadata written ahead of the records.
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Field separator of the text form.
    #[inline]
    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records have been added.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the current order reflects the last sequencing pass.
    #[inline]
    #[must_use]
    pub fn is_sequenced(&self) -> bool {
        self.is_sequenced
    }

    /// Granularity of the last sequencing pass.
    #[inline]
    #[must_use]
    pub fn shuffle_granularity(&self) -> Granularity {
        self.shuffle_granularity
    }

    /// Direction of the last sequencing pass.
    #[inline]
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reverse
    }
}

impl Extend<TemporalRecord> for Sequencer {
    fn extend<I: IntoIterator<Item = TemporalRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
        self.is_sequenced = false;
    }
}

impl CodeSequencer for Sequencer {
    fn sequence(&mut self, granularity: Granularity, reverse: bool) {
        Sequencer::sequence(self, granularity, reverse);
    }

    fn serialize(
        &mut self,
        granularity: Granularity,
        reverse: bool,
    ) -> Result<String, SequencerError> {
        Sequencer::serialize(self, granularity, reverse)
    }
}

/// Rejects separators that would make a line ambiguous to split.
pub(crate) fn validate_separator(separator: char) -> Result<(), SequencerError> {
    if separator.is_ascii_digit() || RESERVED_SEPARATORS.contains(&separator) {
        return Err(SequencerError::InvalidSeparator { separator });
    }
    Ok(())
}
