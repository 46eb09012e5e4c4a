/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Sequencer module for canonical ordering of timestamped code records.
//!
//! This module provides a single-threaded [`Sequencer`] that takes
//! timestamped codes in any order and produces one deterministic-up-to-shuffle
//! sequence per subject, plus the text codec used to store and exchange it.
//!
//! # Architecture
//!
//! - Records are appended with [`Sequencer::add`] in any order
//! - [`Sequencer::sequence`] stably sorts them by timestamp
//! - Runs of records sharing a truncated timestamp at the requested
//!   [`Granularity`] are shuffled independently
//! - [`Sequencer::serialize`] writes `<metadata><sep><record>...` and
//!   [`Sequencer::read`] parses it back
//! - [`batch`] groups rows by subject and streams lines into a
//!   [`SequenceSink`]
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use temporal_sequencer::sequencer::{Granularity, Sequencer};
//!
//! let jan1 = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let jan2 = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
//!
//! let mut seq = Sequencer::new();
//! seq.add(jan2.and_hms_opt(0, 0, 0).unwrap(), "C");
//! seq.add(jan1.and_hms_opt(9, 0, 0).unwrap(), "B");
//! seq.add(jan1.and_hms_opt(8, 0, 0).unwrap(), "A");
//!
//! seq.sequence(Granularity::Day, false);
//! assert_eq!(seq.records()[2].code(), "C");
//! ```

pub mod batch;
pub mod core;
pub mod error;
pub mod granularity;
pub mod metadata;
pub mod options;
pub mod record;
pub mod sink;

#[cfg(test)]
mod tests;

// Re-export main types
pub use batch::SubjectRow;
pub use self::core::{CodeSequencer, DEFAULT_SEPARATOR, Sequencer};
pub use error::{BatchError, ErrorKind, SequencerError};
pub use granularity::Granularity;
pub use metadata::Metadata;
pub use options::BatchOptions;
pub use record::TemporalRecord;
pub use sink::{InMemorySink, LineWriterSink, SequenceSink};
