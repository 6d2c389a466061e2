//! Error types for ebscan-parser.

use thiserror::Error;

/// Errors that can occur while parsing beacon advertisements.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Hex string contains a non-hex character or has an odd length.
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Requested field does not fit inside the hex string.
    #[error("Field out of range: offset {offset} + {length} bytes exceeds {available} hex characters")]
    OutOfRange {
        /// Offset in hex characters.
        offset: usize,
        /// Field length in bytes.
        length: usize,
        /// Number of hex characters available.
        available: usize,
    },

    /// Field is too wide for an unsigned 32-bit value.
    #[error("Field of {length} bytes does not fit in 32 bits")]
    Overflow {
        /// Field length in bytes.
        length: usize,
    },

    /// Protocol version nibble is not one we know how to dispatch on.
    #[error("Unsupported protocol version: {0}")]
    UnsupportedProtocolVersion(u8),

    /// The advertisement carries no Estimote payload.
    #[error("Advertisement has no Estimote payload")]
    MissingPayload,

    /// Service UUID string could not be parsed.
    #[error("Invalid service UUID: {0}")]
    InvalidUuid(String),

    /// Decode error at a specific byte offset.
    #[error("Decode error at offset {offset}: {message}")]
    DecodeError {
        /// Byte offset where the error occurred.
        offset: usize,
        /// Description of the error.
        message: String,
    },
}

impl ScanError {
    /// Create a decode error at a specific offset.
    pub fn decode_at(offset: usize, message: impl Into<String>) -> Self {
        ScanError::DecodeError {
            offset,
            message: message.into(),
        }
    }

    /// Create an invalid hex error.
    pub fn invalid_hex(message: impl Into<String>) -> Self {
        ScanError::InvalidHex(message.into())
    }
}

impl From<hex::FromHexError> for ScanError {
    fn from(err: hex::FromHexError) -> Self {
        ScanError::InvalidHex(err.to_string())
    }
}
