//! Still-image decoding into RGBA8 buffers

use super::error::CodecError;
use super::format::WatermarkImageFormat;
use image::io::Reader as ImageReader;
use image::RgbaImage;
use std::io::Cursor;

/// Decode image data in a known format.
///
/// Animated formats yield their first frame.
pub fn decode_image(data: &[u8], format: WatermarkImageFormat) -> Result<RgbaImage, CodecError> {
    image::load_from_memory_with_format(data, format.to_image_format())
        .map(|img| img.to_rgba8())
        .map_err(|e| CodecError::decode_failed(e.to_string()))
}

/// Decode image data, guessing the format from its magic bytes
pub fn decode_image_guessed(data: &[u8]) -> Result<RgbaImage, CodecError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CodecError::decode_failed(e.to_string()))?
        .decode()
        .map(|img| img.to_rgba8())
        .map_err(|e| CodecError::decode_failed(e.to_string()))
}
