/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Batch configuration.

use super::core::{DEFAULT_SEPARATOR, validate_separator};
use super::error::SequencerError;
use super::granularity::Granularity;
use serde::{Deserialize, Serialize};

/// Settings shared by every sequencer built and written in one batch.
///
/// Missing fields fall back to their defaults when deserialized, so a
/// configuration file only needs to name what it changes.
///
/// # Examples
///
/// ```
/// use temporal_sequencer::{BatchOptions, Granularity};
///
/// let options: BatchOptions =
///     serde_json::from_str(r#"{"subject_key": "person_id", "granularity": "day"}"#).unwrap();
/// assert_eq!(options.subject_key, "person_id");
/// assert_eq!(options.granularity, Granularity::Day);
/// assert_eq!(options.separator, '\t');
/// assert!(!options.reverse);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Metadata key under which each subject's identifier is stored.
    pub subject_key: String,

    /// Field separator of every line.
    pub separator: char,

    /// Shuffle granularity applied when writing.
    pub granularity: Granularity,

    /// Write the most recent records first.
    pub reverse: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            subject_key: "subject_id".to_string(),
            separator: DEFAULT_SEPARATOR,
            granularity: Granularity::None,
            reverse: false,
        }
    }
}

impl BatchOptions {
    /// Checks that the separator is usable.
    ///
    /// # Errors
    ///
    /// Returns [`SequencerError::InvalidSeparator`] if the separator is
    /// reserved by the record encoding.
    pub fn validate(&self) -> Result<(), SequencerError> {
        validate_separator(self.separator)
    }
}
