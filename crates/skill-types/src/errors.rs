//! Envelope decoding errors.

use thiserror::Error;

/// Errors raised while decoding the webhook envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The body is not a JSON request envelope.
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// The inner `request` member lacks the common header fields.
    #[error("invalid inner request: {0}")]
    InvalidRequest(String),
}

impl From<serde_json::Error> for EnvelopeError {
    fn from(err: serde_json::Error) -> Self {
        EnvelopeError::Malformed(err.to_string())
    }
}
