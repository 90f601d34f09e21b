//! Amenities validation.
//!
//! Amenities are stored as a JSON array of short free-text labels. Input
//! may arrive as JSON text (form posts, CSV-style imports) or as an
//! already-decoded JSON value (JSON request bodies). The validator is a
//! guard only: it never rewrites the value.

use serde_json::Value;

use crate::error::CoreError;

/// Maximum length of a single amenity label, in characters.
pub const MAX_AMENITY_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmenitiesError {
    #[error("amenities is not valid JSON")]
    InvalidFormat,

    #[error("expected {expected}, got '{value}'")]
    TypeMismatch {
        expected: &'static str,
        value: String,
    },

    #[error("Amenity '{value}' exceeds {limit} characters")]
    LengthExceeded { value: String, limit: usize },
}

impl From<AmenitiesError> for CoreError {
    fn from(err: AmenitiesError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Validate amenities given as JSON text.
pub fn validate_amenities_text(text: &str) -> Result<(), AmenitiesError> {
    let decoded: Value = serde_json::from_str(text).map_err(|_| AmenitiesError::InvalidFormat)?;
    validate_decoded(&decoded)
}

/// Validate an amenities value.
///
/// A top-level JSON string is treated as encoded JSON text and decoded
/// first; any other value is checked as-is.
pub fn validate_amenities(value: &Value) -> Result<(), AmenitiesError> {
    match value {
        Value::String(text) => validate_amenities_text(text),
        other => validate_decoded(other),
    }
}

/// Validate an optional amenities column; `None` and JSON `null` are allowed.
pub fn validate_optional_amenities(value: Option<&Value>) -> Result<(), AmenitiesError> {
    match value {
        None | Some(Value::Null) => Ok(()),
        Some(v) => validate_amenities(v),
    }
}

fn validate_decoded(value: &Value) -> Result<(), AmenitiesError> {
    let items = value.as_array().ok_or_else(|| AmenitiesError::TypeMismatch {
        expected: "an array of strings",
        value: value.to_string(),
    })?;

    for item in items {
        let label = item.as_str().ok_or_else(|| AmenitiesError::TypeMismatch {
            expected: "a string",
            value: item.to_string(),
        })?;
        if label.chars().count() > MAX_AMENITY_LEN {
            return Err(AmenitiesError::LengthExceeded {
                value: label.to_string(),
                limit: MAX_AMENITY_LEN,
            });
        }
    }

    Ok(())
}
