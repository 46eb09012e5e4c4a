/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Flat JSON metadata attached to a sequence.
//!
//! Metadata is written with `", "` and `": "` between items, so a subject
//! header reads `{"person_id": 123456789}` on the wire.

use super::error::SequencerError;
use serde_json::{Map, Value};

/// String-keyed metadata, kept in insertion order.
pub type Metadata = Map<String, Value>;

/// Checks that every value is a JSON scalar.
pub(crate) fn validate(metadata: &Metadata) -> Result<(), SequencerError> {
    match metadata.iter().find(|(_, v)| !is_scalar(v)) {
        Some((key, _)) => Err(SequencerError::NonScalarMetadata { key: key.clone() }),
        None => Ok(()),
    }
}

/// Renders flat metadata as a JSON object.
pub(crate) fn render(metadata: &Metadata) -> String {
    let fields: Vec<String> = metadata
        .iter()
        .map(|(key, value)| format!("{}: {}", Value::from(key.as_str()), value))
        .collect();
    format!("{{{}}}", fields.join(", "))
}

/// Parses a metadata segment back into a flat map.
pub(crate) fn parse(text: &str) -> Result<Metadata, SequencerError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| SequencerError::MalformedMetadata {
            reason: e.to_string(),
        })?;

    let Value::Object(metadata) = value else {
        return Err(SequencerError::MalformedMetadata {
            reason: format!("expected a JSON object, found '{text}'"),
        });
    };

    if let Some((key, _)) = metadata.iter().find(|(_, v)| !is_scalar(v)) {
        return Err(SequencerError::MalformedMetadata {
            reason: format!("value for key '{key}' is not a scalar"),
        });
    }

    Ok(metadata)
}

#[inline]
fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
