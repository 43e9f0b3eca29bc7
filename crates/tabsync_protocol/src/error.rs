//! Error types for the protocol crate.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Failed to encode a message.
    #[error("encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Failed to decode a message.
    #[error("decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ProtocolError {
    /// Returns true if this error came from malformed input.
    pub fn is_decode(&self) -> bool {
        matches!(self, ProtocolError::Decode(_))
    }
}
