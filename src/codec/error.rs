//! Codec error types.

use serde_json::Value;
use thiserror::Error;

/// Errors raised while turning a payload into typed entities.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not valid JSON.
    #[error("Malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A union payload has no `$type` key.
    #[error("Missing '$type' discriminator for {expected}")]
    MissingDiscriminator { expected: &'static str },

    /// The `$type` value names no known variant.
    #[error("Unknown '$type' discriminator '{tag}' for {expected}")]
    UnknownDiscriminator { tag: String, expected: &'static str },

    /// A required field is absent from the payload.
    #[error("Missing required field '{field}' in {entity}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A value has the wrong JSON type.
    #[error("Invalid value for '{key}': expected {expected}, found {found}")]
    InvalidType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A timestamp or date could not be interpreted.
    #[error("Invalid timestamp for '{key}': {value}")]
    InvalidTimestamp { key: String, value: String },

    /// A "date and time" simple custom field carries a non-integer value.
    #[error("'date and time' field must be an integer")]
    DateTimeNotInteger,

    /// The simple field value was decoded before its project custom field.
    #[error("The project custom field must be decoded before the simple field value")]
    SiblingUnavailable,
}

impl DecodeError {
    pub(crate) fn invalid_type(key: &str, expected: &'static str, found: &Value) -> Self {
        DecodeError::InvalidType {
            key: key.to_string(),
            expected,
            found: json_kind(found),
        }
    }

    pub(crate) fn invalid_timestamp(key: &str, value: impl ToString) -> Self {
        DecodeError::InvalidTimestamp {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Errors raised while merging the two wire views of an entity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    /// The same key holds structurally different values.
    #[error("Cannot merge '{key}': {existing} does not match {incoming}")]
    TypeMismatch {
        key: String,
        existing: &'static str,
        incoming: &'static str,
    },

    /// Two sequences at the same key differ in length.
    #[error("Cannot merge '{key}': sequence lengths differ ({existing} vs {incoming})")]
    LengthMismatch {
        key: String,
        existing: usize,
        incoming: usize,
    },
}

/// Errors raised while producing wire bytes.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// NaN and infinities have no JSON literal.
    #[error("Cannot encode non-finite float {0} for '{1}'")]
    NonFiniteFloat(f64, String),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
