//! Decoding and encoding of raster images
//!
//! The watermark engine only works on RGBA8 pixel buffers. Everything that
//! touches a container format lives here, behind the [`ImageCodec`] trait so
//! the engine can be driven with a different codec in tests or embedders.
//!
//! # Formats
//!
//! | Format | Decode | Encode | Animated |
//! |--------|--------|--------|----------|
//! | PNG    | yes    | yes    | no       |
//! | JPEG   | yes    | yes    | no       |
//! | GIF    | yes    | yes    | yes      |
//! | WebP   | yes    | lossless | no     |
//! | BMP    | yes    | yes    | no       |

pub mod animated;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;

pub use decoder::{decode_image, decode_image_guessed};
pub use encoder::{EncodedImage, EncoderFactory, EncoderQuality, ImageEncoder};
pub use error::CodecError;
pub use format::{FrameCapability, WatermarkImageFormat};

use crate::watermark::animation::AnimatedImage;
use image::RgbaImage;

/// Codec boundary used by the watermark processor.
pub trait ImageCodec: Send + Sync {
    /// Decode a still image (or the first frame of an animation)
    fn decode(&self, data: &[u8], format: WatermarkImageFormat) -> Result<RgbaImage, CodecError>;

    /// Decode bytes whose format is not known up front
    fn decode_any(&self, data: &[u8]) -> Result<RgbaImage, CodecError>;

    fn encode(
        &self,
        image: &RgbaImage,
        format: WatermarkImageFormat,
    ) -> Result<EncodedImage, CodecError>;

    /// Decode every frame of an animated image
    fn decode_frames(
        &self,
        data: &[u8],
        format: WatermarkImageFormat,
    ) -> Result<AnimatedImage, CodecError>;

    /// Encode an animation in the given animated container format
    fn encode_frames(
        &self,
        animation: &AnimatedImage,
        format: WatermarkImageFormat,
    ) -> Result<EncodedImage, CodecError>;
}

/// Codec backed by the `image` and `gif` crates
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCodec {
    quality: EncoderQuality,
}

impl DefaultCodec {
    pub fn new(quality: EncoderQuality) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> EncoderQuality {
        self.quality
    }
}

impl ImageCodec for DefaultCodec {
    fn decode(&self, data: &[u8], format: WatermarkImageFormat) -> Result<RgbaImage, CodecError> {
        decode_image(data, format)
    }

    fn decode_any(&self, data: &[u8]) -> Result<RgbaImage, CodecError> {
        decode_image_guessed(data)
    }

    fn encode(
        &self,
        image: &RgbaImage,
        format: WatermarkImageFormat,
    ) -> Result<EncodedImage, CodecError> {
        EncoderFactory::create(format).encode(
            image.as_raw(),
            image.width(),
            image.height(),
            self.quality,
        )
    }

    fn decode_frames(
        &self,
        data: &[u8],
        format: WatermarkImageFormat,
    ) -> Result<AnimatedImage, CodecError> {
        match format {
            WatermarkImageFormat::Gif => animated::decode_gif_frames(data),
            other => Err(CodecError::decode_failed(format!(
                "{} is not an animated format",
                other
            ))),
        }
    }

    fn encode_frames(
        &self,
        animation: &AnimatedImage,
        format: WatermarkImageFormat,
    ) -> Result<EncodedImage, CodecError> {
        match format {
            WatermarkImageFormat::Gif => Ok(EncodedImage::new(
                animated::encode_gif_frames(animation)?,
                WatermarkImageFormat::Gif,
            )),
            other => Err(CodecError::encode_failed(
                other.as_str(),
                "not an animated format",
            )),
        }
    }
}
