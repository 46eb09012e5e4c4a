/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Timestamped code records.
//!
//! A [`TemporalRecord`] pairs a timestamp with an opaque code and knows how
//! to write itself as `(<timestamp>, <code>)` and read that text back.

use super::error::SequencerError;
use chrono::{Datelike, NaiveDateTime, SubsecRound};
use std::fmt;
use std::str::FromStr;

/// `strftime` layout of a timestamp on the wire.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S%.6f";

/// Width of a formatted timestamp, e.g. `2020-01-01_08:00:00.000000`.
pub const TIMESTAMP_WIDTH: usize = 26;

const FIELD_DELIMITER: &str = ", ";

/// A single timestamped code.
///
/// The timestamp is truncated to microseconds on construction, which is the
/// precision of the text encoding. Records have no identity beyond their two
/// fields.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use temporal_sequencer::TemporalRecord;
///
/// let ts = NaiveDate::from_ymd_opt(2021, 3, 4)
///     .unwrap()
///     .and_hms_micro_opt(5, 6, 7, 89)
///     .unwrap();
/// let record = TemporalRecord::new(ts, "4329847");
/// assert_eq!(record.serialize(), "(2021-03-04_05:06:07.000089, 4329847)");
/// assert_eq!(TemporalRecord::read(&record.serialize()).unwrap(), record);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemporalRecord {
    timestamp: NaiveDateTime,
    code: String,
}

impl TemporalRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(timestamp: NaiveDateTime, code: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(6),
            code: code.into(),
        }
    }

    /// When the event happened.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The opaque event code.
    #[inline]
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns `true` if the code can be written with `separator` and read
    /// back unchanged.
    ///
    /// Line breaks are never encodable since batches hold one sequence per
    /// line.
    #[inline]
    #[must_use]
    pub fn is_encodable(&self, separator: char) -> bool {
        !self.code.contains([')', '\n', '\r', separator])
    }

    /// Returns `true` if the timestamp fits the fixed-width text form, i.e.
    /// its year is within `0..=9999`.
    #[inline]
    #[must_use]
    pub fn has_encodable_timestamp(&self) -> bool {
        (0..=9999).contains(&self.timestamp.year())
    }

    /// Renders the record as `(<YYYY-MM-DD_HH:MM:SS.ffffff>, <code>)`.
    ///
    /// The code is written verbatim.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Parses the text produced by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::MalformedRecord`] if the brackets or the
    /// `", "` delimiter are missing, the code contains `)`, or the timestamp
    /// is not exactly the fixed-width microsecond form.
    pub fn read(text: &str) -> Result<Self, SequencerError> {
        let malformed = |reason: &str| SequencerError::MalformedRecord {
            index: 0,
            segment: text.to_string(),
            reason: reason.to_string(),
        };

        let inner = text
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| malformed("expected '(' ... ')'"))?;

        let (timestamp, code) = inner
            .split_once(FIELD_DELIMITER)
            .ok_or_else(|| malformed("missing ', ' between timestamp and code"))?;

        if code.contains(')') {
            return Err(malformed("code contains ')'"));
        }
        if timestamp.len() != TIMESTAMP_WIDTH {
            return Err(malformed("timestamp is not YYYY-MM-DD_HH:MM:SS.ffffff"));
        }

        let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| malformed(&format!("invalid timestamp: {e}")))?;

        Ok(Self::new(timestamp, code))
    }
}

impl fmt::Display for TemporalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}{FIELD_DELIMITER}{})",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.code
        )
    }
}

impl FromStr for TemporalRecord {
    type Err = SequencerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::read(s)
    }
}
