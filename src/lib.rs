/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! # temporal-sequencer
//!
//! Orders timestamped clinical event records (diagnosis, drug, procedure and
//! measurement codes) into a single canonical sequence per subject.
//!
//! Records that fall into the same period at a chosen [`Granularity`] are
//! shuffled among themselves, so the output never reveals the order in which
//! same-day (or same-hour, ...) events happened to be recorded. The ordered
//! collection is written to a stable, tab-separated text line and can be
//! read back without loss.
//!
//! ```
//! use chrono::NaiveDate;
//! use temporal_sequencer::{Granularity, Sequencer};
//!
//! # fn main() -> Result<(), temporal_sequencer::SequencerError> {
//! let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
//! let mut seq = Sequencer::new();
//! seq.add(day.and_hms_opt(9, 0, 0).unwrap(), "201826");
//! seq.add(day.and_hms_opt(8, 0, 0).unwrap(), "1112807");
//!
//! let line = seq.serialize(Granularity::None, false)?;
//! assert_eq!(
//!     line,
//!     "{}\t(2020-01-01_08:00:00.000000, 1112807)\t(2020-01-01_09:00:00.000000, 201826)"
//! );
//!
//! let restored = Sequencer::read(&line, '\t')?;
//! assert_eq!(restored.records(), seq.records());
//! # Ok(())
//! # }
//! ```

pub mod sequencer;

pub use sequencer::{
    BatchError, BatchOptions, CodeSequencer, ErrorKind, Granularity, InMemorySink,
    LineWriterSink, SequenceSink, Sequencer, SequencerError, SubjectRow, TemporalRecord,
};
