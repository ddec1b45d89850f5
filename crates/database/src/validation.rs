//! Input validation for tracking requests.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Duration that is negative, NaN or infinite.
    InvalidDuration(f64),
    /// Date or date-time that could not be parsed.
    InvalidDate(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} is required", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::InvalidDuration(value) => {
                write!(f, "duration_seconds must be a non-negative number, got {}", value)
            }
            ValidationError::InvalidDate(msg) => write!(f, "Invalid date: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for chat messages.
pub const MAX_MESSAGE_LENGTH: usize = 8000;

/// Validate an activity type.
///
/// The set of activity types is open. Blank values are rejected; anything else
/// is returned exactly as sent.
pub fn validate_activity_type(activity_type: Option<&str>) -> Result<String, ValidationError> {
    match activity_type {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(ValidationError::Empty("Activity type".to_string())),
    }
}

/// Validate a reported duration, defaulting to zero.
pub fn validate_duration(duration_seconds: Option<f64>) -> Result<f64, ValidationError> {
    match duration_seconds {
        None => Ok(0.0),
        Some(value) if value.is_finite() && value >= 0.0 => Ok(value),
        Some(value) => Err(ValidationError::InvalidDuration(value)),
    }
}

/// Validate a chat message and return it trimmed.
pub fn validate_message(message: Option<&str>) -> Result<String, ValidationError> {
    let message = message.map(str::trim).unwrap_or_default();

    if message.is_empty() {
        return Err(ValidationError::Empty("Message".to_string()));
    }

    let len = message.chars().count();
    if len > MAX_MESSAGE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "message".to_string(),
            max: MAX_MESSAGE_LENGTH,
            actual: len,
        });
    }

    Ok(message.to_string())
}
