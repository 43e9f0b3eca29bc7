//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A percent-escape sequence did not decode to valid UTF-8.
    #[error("invalid escape sequence in {token:?}: {message}")]
    InvalidEscape {
        /// The token that failed to decode.
        token: String,
        /// Description of the failure.
        message: String,
    },

    /// A string is not a `data:` URI with a base64 payload.
    #[error("invalid data URI: {message}")]
    InvalidDataUri {
        /// Description of the failure.
        message: String,
    },

    /// The base64 payload of a data URI could not be decoded.
    #[error("base64 decoding failed: {0}")]
    Base64(String),
}

impl CodecError {
    /// Creates an invalid data URI error.
    pub fn invalid_data_uri(message: impl Into<String>) -> Self {
        Self::InvalidDataUri {
            message: message.into(),
        }
    }
}
