//! Validation error types

use std::fmt;

/// Validation error for client input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Integer field outside its allowed range
    OutOfRange {
        field: &'static str,
        min: i32,
        max: i32,
    },

    /// Path parameter is not a positive, non-zero integer
    InvalidId { param: &'static str },

    /// Request body could not be decoded
    MalformedBody { reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "must specify {}", field),
            Self::OutOfRange { field, min, max } => {
                write!(f, "must specify {} between {}-{}", field, min, max)
            }
            Self::InvalidId { param } => {
                write!(f, "param {} must be a valid, non-zero numeral", param)
            }
            Self::MalformedBody { reason } => {
                write!(f, "error decoding request body: {}", reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reject empty or whitespace-only input; the value is kept as sent.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(value.to_owned())
}

/// Optional text: only the empty string counts as absent.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_owned)
}
