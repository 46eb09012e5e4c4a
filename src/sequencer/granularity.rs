/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Time granularity at which records are treated as simultaneous.

use super::error::SequencerError;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Truncated timestamp used to decide run membership.
///
/// Fields finer than the granularity are zeroed, so two timestamps belong
/// to the same run exactly when their buckets compare equal.
pub(crate) type Bucket = (NaiveDate, u32, u32, u32, u32);

/// Precision used to group records before shuffling.
///
/// Parses from the long names (`"day"`), the single strftime letters used
/// by older pipelines (`"d"`, `"H"`, `"M"`, `"S"`, `"f"`), and their
/// `%`-prefixed forms.
///
/// # Examples
///
/// ```
/// use temporal_sequencer::Granularity;
///
/// assert_eq!("day".parse::<Granularity>().unwrap(), Granularity::Day);
/// assert_eq!("%H".parse::<Granularity>().unwrap(), Granularity::Hour);
/// assert!("bogus".parse::<Granularity>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Strict chronological order, no shuffling.
    #[default]
    None,
    /// Shuffle records sharing a calendar day.
    Day,
    /// Shuffle records sharing an hour.
    Hour,
    /// Shuffle records sharing a minute.
    Minute,
    /// Shuffle records sharing a second.
    Second,
    /// Shuffle records sharing an exact microsecond timestamp.
    Microsecond,
}

impl Granularity {
    /// All supported levels.
    pub const ALL: [Granularity; 6] = [
        Self::None,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Microsecond,
    ];

    /// Returns `true` if this level shuffles at all.
    #[inline]
    #[must_use]
    pub fn shuffles(self) -> bool {
        self != Self::None
    }

    /// Long lowercase name of the level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::Microsecond => "microsecond",
        }
    }

    /// Truncates `timestamp` to this granularity.
    ///
    /// `None` keeps full precision, which makes it equivalent to
    /// `Microsecond` for grouping purposes.
    pub(crate) fn bucket(self, timestamp: &NaiveDateTime) -> Bucket {
        let date = timestamp.date();
        let (h, m, s) = (timestamp.hour(), timestamp.minute(), timestamp.second());
        let micros = timestamp.nanosecond() / 1_000;
        match self {
            Self::Day => (date, 0, 0, 0, 0),
            Self::Hour => (date, h, 0, 0, 0),
            Self::Minute => (date, h, m, 0, 0),
            Self::Second => (date, h, m, s, 0),
            Self::Microsecond | Self::None => (date, h, m, s, micros),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = SequencerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = match s.strip_prefix('%') {
            Some(letter) if letter.len() == 1 => letter,
            _ => s,
        };
        match token {
            "" | "none" => Ok(Self::None),
            "d" | "day" => Ok(Self::Day),
            "H" | "hour" => Ok(Self::Hour),
            "M" | "minute" => Ok(Self::Minute),
            "S" | "second" => Ok(Self::Second),
            "f" | "microsecond" => Ok(Self::Microsecond),
            _ => Err(SequencerError::UnsupportedGranularity {
                token: s.to_string(),
            }),
        }
    }
}
