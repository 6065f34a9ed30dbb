//! Image encoder abstraction
//!
//! One encoder per still format, created through [`EncoderFactory`]. All
//! encoders take straight-alpha RGBA8 pixels; formats without an alpha
//! channel drop it.

use super::error::CodecError;
use super::format::WatermarkImageFormat;

/// Quality settings for image encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderQuality {
    /// Quality value (1-100, where 100 is best quality). Only lossy formats use it.
    pub quality: u8,
}

impl Default for EncoderQuality {
    fn default() -> Self {
        Self { quality: 100 }
    }
}

impl EncoderQuality {
    /// Create quality settings with specified quality level
    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

/// Result of encoding an image
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// The encoded image data
    pub data: Vec<u8>,
    /// The output format
    pub format: WatermarkImageFormat,
    /// MIME type of `data`
    pub content_type: &'static str,
}

impl EncodedImage {
    pub fn new(data: Vec<u8>, format: WatermarkImageFormat) -> Self {
        let content_type = format.content_type();
        Self {
            data,
            format,
            content_type,
        }
    }
}

/// Trait for still-image encoders
///
/// The trait is object-safe so the factory can hand out boxed encoders.
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> WatermarkImageFormat;

    /// Encode raw RGBA image data to the target format
    ///
    /// # Arguments
    /// * `data` - Raw pixel data in RGBA format (4 bytes per pixel)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `quality` - Quality settings
    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: EncoderQuality,
    ) -> Result<EncodedImage, CodecError>;

    /// Check if this encoder keeps the alpha channel
    fn supports_transparency(&self) -> bool;
}

/// JPEG encoder using the image crate
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> WatermarkImageFormat {
        WatermarkImageFormat::Jpeg
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        quality: EncoderQuality,
    ) -> Result<EncodedImage, CodecError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        check_buffer_len(data, width, height, "jpeg")?;

        let rgb_data = rgba_to_rgb(data);

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, quality.quality);

        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8)
            .map_err(|e| CodecError::encode_failed("jpeg", e.to_string()))?;

        Ok(EncodedImage::new(
            output.into_inner(),
            WatermarkImageFormat::Jpeg,
        ))
    }

    fn supports_transparency(&self) -> bool {
        false
    }
}

/// PNG encoder using the image crate
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> WatermarkImageFormat {
        WatermarkImageFormat::Png
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        _quality: EncoderQuality,
    ) -> Result<EncodedImage, CodecError> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        check_buffer_len(data, width, height, "png")?;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImagePngEncoder::new(&mut output);

        encoder
            .write_image(data, width, height, image::ColorType::Rgba8)
            .map_err(|e| CodecError::encode_failed("png", e.to_string()))?;

        Ok(EncodedImage::new(
            output.into_inner(),
            WatermarkImageFormat::Png,
        ))
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// WebP encoder using the image crate
///
/// The `image` crate only encodes lossless WebP, so quality is ignored.
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn format(&self) -> WatermarkImageFormat {
        WatermarkImageFormat::Webp
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        _quality: EncoderQuality,
    ) -> Result<EncodedImage, CodecError> {
        use image::codecs::webp::WebPEncoder as ImageWebPEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        check_buffer_len(data, width, height, "webp")?;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageWebPEncoder::new_lossless(&mut output);

        encoder
            .write_image(data, width, height, image::ColorType::Rgba8)
            .map_err(|e| CodecError::encode_failed("webp", e.to_string()))?;

        Ok(EncodedImage::new(
            output.into_inner(),
            WatermarkImageFormat::Webp,
        ))
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// BMP encoder using the image crate
pub struct BmpEncoder;

impl ImageEncoder for BmpEncoder {
    fn format(&self) -> WatermarkImageFormat {
        WatermarkImageFormat::Bmp
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        _quality: EncoderQuality,
    ) -> Result<EncodedImage, CodecError> {
        use image::codecs::bmp::BmpEncoder as ImageBmpEncoder;
        use image::ImageEncoder as _;

        check_buffer_len(data, width, height, "bmp")?;

        let mut output = Vec::new();
        let encoder = ImageBmpEncoder::new(&mut output);

        encoder
            .write_image(data, width, height, image::ColorType::Rgba8)
            .map_err(|e| CodecError::encode_failed("bmp", e.to_string()))?;

        Ok(EncodedImage::new(output, WatermarkImageFormat::Bmp))
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// Single-frame GIF encoder
///
/// Animated sequences go through [`super::animated`] instead; this one handles a
/// still image that the caller asked to be written as GIF.
pub struct GifEncoder;

impl ImageEncoder for GifEncoder {
    fn format(&self) -> WatermarkImageFormat {
        WatermarkImageFormat::Gif
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        _quality: EncoderQuality,
    ) -> Result<EncodedImage, CodecError> {
        use image::codecs::gif::GifEncoder as ImageGifEncoder;

        check_buffer_len(data, width, height, "gif")?;

        let mut output = Vec::new();
        {
            let mut encoder = ImageGifEncoder::new(&mut output);
            encoder
                .encode(data, width, height, image::ColorType::Rgba8)
                .map_err(|e| CodecError::encode_failed("gif", e.to_string()))?;
        }

        Ok(EncodedImage::new(output, WatermarkImageFormat::Gif))
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    /// Create an encoder for the specified output format
    pub fn create(format: WatermarkImageFormat) -> Box<dyn ImageEncoder> {
        match format {
            WatermarkImageFormat::Jpeg => Box::new(JpegEncoder),
            WatermarkImageFormat::Png => Box::new(PngEncoder),
            WatermarkImageFormat::Webp => Box::new(WebPEncoder),
            WatermarkImageFormat::Bmp => Box::new(BmpEncoder),
            WatermarkImageFormat::Gif => Box::new(GifEncoder),
        }
    }
}

/// The image crate panics on a mismatched buffer, so reject it up front
fn check_buffer_len(data: &[u8], width: u32, height: u32, format: &str) -> Result<(), CodecError> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(CodecError::encode_failed(
            format,
            format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            ),
        ));
    }
    Ok(())
}

/// Convert RGBA to RGB by discarding alpha channel
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let pixel_count = rgba.len() / 4;
    let mut rgb = Vec::with_capacity(pixel_count * 3);

    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }

    rgb
}
