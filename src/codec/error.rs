//! Codec error types
//!
//! Failures raised by decoders and encoders. The watermark layer converts
//! these into its own error type via `From`.

use thiserror::Error;

/// Errors that can occur while decoding or encoding pixel data
#[derive(Debug, Clone, Error)]
pub enum CodecError {
    /// Failed to decode image data
    #[error("Failed to decode image: {message}")]
    DecodeFailed { message: String },

    /// Encoding to output format failed
    #[error("Failed to encode to {format}: {message}")]
    EncodeFailed { format: String, message: String },
}

impl CodecError {
    pub fn decode_failed(message: impl Into<String>) -> Self {
        CodecError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        CodecError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }
}
