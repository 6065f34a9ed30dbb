//! Watermark error types.
//!
//! Every failure the engine can report is a variant of [`WatermarkError`].
//! Errors are returned synchronously and never retried; an operation that
//! fails produces no partial output.

use crate::codec::CodecError;
use thiserror::Error;

/// Errors that can occur during watermark processing.
#[derive(Debug, Error)]
pub enum WatermarkError {
    /// Extension or format tag outside the supported table
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },

    /// Placement mode used on a path that cannot honour it
    #[error("Invalid placement '{position}': {reason}")]
    InvalidPlacement { position: String, reason: String },

    /// Blank text with no explicit watermark image
    #[error("Watermark source is empty: provide non-blank text or an image")]
    EmptyWatermarkSource,

    /// Animated input decoded to zero frames
    #[error("Animated image contains no frames")]
    EmptyAnimation,

    /// Base or watermark bytes could not be decoded
    #[error("Failed to decode image: {message}")]
    DecodeFailure { message: String },

    /// Result could not be encoded to the target format
    #[error("Failed to encode to {format}: {message}")]
    EncodeFailure { format: String, message: String },

    /// Text watermark could not be rendered
    #[error("Failed to render text watermark: {0}")]
    RenderFailure(String),

    /// Reading the input or writing the output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatermarkError {
    /// Helper constructors for common error patterns
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        WatermarkError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn invalid_placement(position: impl Into<String>, reason: impl Into<String>) -> Self {
        WatermarkError::InvalidPlacement {
            position: position.into(),
            reason: reason.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        WatermarkError::DecodeFailure {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        WatermarkError::EncodeFailure {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn render_failed(message: impl Into<String>) -> Self {
        WatermarkError::RenderFailure(message.into())
    }
}

impl From<CodecError> for WatermarkError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::DecodeFailed { message } => WatermarkError::DecodeFailure { message },
            CodecError::EncodeFailed { format, message } => {
                WatermarkError::EncodeFailure { format, message }
            }
        }
    }
}
