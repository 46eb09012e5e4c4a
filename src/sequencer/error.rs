/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Error types for sequencing and the text codec.

use thiserror::Error;

/// Broad classification of a [`SequencerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed a value the sequencer cannot work with.
    InvalidArgument,
    /// Serialized text did not have the expected shape.
    Format,
}

/// Errors that can occur when building, sequencing, or (de)serializing a
/// [`Sequencer`](super::Sequencer).
#[derive(Debug, Error)]
pub enum SequencerError {
    /// The granularity token is not one of the supported levels.
    #[error("unsupported granularity '{token}'")]
    UnsupportedGranularity {
        /// The token that failed to parse.
        token: String,
    },

    /// A metadata value is not a JSON scalar.
    #[error("metadata value for key '{key}' is not a flat scalar")]
    NonScalarMetadata {
        /// Key holding the offending value.
        key: String,
    },

    /// The separator would be ambiguous with the record or timestamp encoding.
    #[error("separator {separator:?} collides with the record encoding")]
    InvalidSeparator {
        /// The rejected separator.
        separator: char,
    },

    /// A code contains `)`, a line break, or the separator and cannot be
    /// written safely.
    #[error("code {code:?} contains ')', a line break, or the separator {separator:?}")]
    UnencodableCode {
        /// The offending code.
        code: String,
        /// Separator in use.
        separator: char,
    },

    /// A timestamp falls outside the years the fixed-width form can hold.
    #[error("timestamp {timestamp} is outside years 0000-9999")]
    UnencodableTimestamp {
        /// The offending timestamp.
        timestamp: String,
    },

    /// The rendered metadata contains the separator.
    #[error("metadata '{rendered}' contains the separator {separator:?}")]
    UnencodableMetadata {
        /// Metadata as it would be written.
        rendered: String,
        /// Separator in use.
        separator: char,
    },

    /// The metadata segment is not a JSON object of scalars.
    #[error("malformed metadata segment: {reason}")]
    MalformedMetadata {
        /// What was wrong with the segment.
        reason: String,
    },

    /// A record segment is not of the form `(<timestamp>, <code>)`.
    #[error("malformed record segment {index} '{segment}': {reason}")]
    MalformedRecord {
        /// Zero-based position of the record within the line.
        index: usize,
        /// The raw segment text.
        segment: String,
        /// What was wrong with the segment.
        reason: String,
    },
}

impl SequencerError {
    /// Returns the broad kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedGranularity { .. }
            | Self::NonScalarMetadata { .. }
            | Self::InvalidSeparator { .. }
            | Self::UnencodableCode { .. }
            | Self::UnencodableTimestamp { .. }
            | Self::UnencodableMetadata { .. } => ErrorKind::InvalidArgument,
            Self::MalformedMetadata { .. } | Self::MalformedRecord { .. } => ErrorKind::Format,
        }
    }

    /// Returns `true` if the caller supplied an unusable argument.
    #[inline]
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    /// Returns `true` if serialized input was malformed.
    #[inline]
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        self.kind() == ErrorKind::Format
    }

    /// Re-tags a record error with its position in the enclosing line.
    pub(crate) fn at_index(self, index: usize) -> Self {
        match self {
            Self::MalformedRecord {
                segment, reason, ..
            } => Self::MalformedRecord {
                index,
                segment,
                reason,
            },
            other => other,
        }
    }
}

/// Errors raised while writing or reading batches of sequences.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A sequencer operation failed.
    #[error(transparent)]
    Sequencer(#[from] SequencerError),

    /// A line of a batch could not be read back.
    #[error("line {line}: {source}")]
    Line {
        /// One-based line number.
        line: usize,
        /// The underlying error.
        #[source]
        source: SequencerError,
    },

    /// The underlying reader or writer failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
