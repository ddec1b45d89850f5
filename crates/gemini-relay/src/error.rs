//! Relay error types.
//!
//! These never reach callers of [`AiRelay`](crate::AiRelay); they are logged and
//! replaced with a fixed reply.

use thiserror::Error;

/// Errors raised by a [`TextGenerator`](crate::TextGenerator).
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or unusable configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// The provider's answer could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The provider answered with an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The prompt or the answer was blocked by safety filters.
    #[error("blocked by safety filters: {0}")]
    Blocked(String),

    /// The provider answered without any text.
    #[error("response contained no text")]
    EmptyResponse,
}
