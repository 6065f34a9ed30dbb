//! Watermark processing pipeline.
//!
//! [`WatermarkProcessor`] ties the pieces together: it routes the input by
//! format, resolves the watermark bitmap once, composites it onto a single
//! image or every frame of an animation, and encodes the result.
//!
//! ```text
//!   bytes + format ──► route ──► Static:   decode ─► composite ─► encode (request format, PNG default)
//!                            └─► Animated: decode frames ─► composite each ─► encode frames (same container)
//! ```

use super::animation::{AnimationProcessor, FrameStrategy};
use super::compositor::{composite_single, composite_tiled};
use super::request::WatermarkRequest;
use super::source::WatermarkSourceResolver;
use super::text_renderer::TextRenderer;
use super::WatermarkError;
use crate::codec::{
    DefaultCodec, EncodedImage, FrameCapability, ImageCodec, WatermarkImageFormat,
};
use image::RgbaImage;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Encoded result of a watermark operation
pub type WatermarkOutput = EncodedImage;

/// Processing path chosen for an input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Static,
    Animated,
}

/// Select the pipeline for a format from its frame capability.
pub fn route(format: WatermarkImageFormat) -> Pipeline {
    match format.capability() {
        FrameCapability::Static => Pipeline::Static,
        FrameCapability::Animated => Pipeline::Animated,
    }
}

/// Apply an already resolved watermark to one bitmap.
///
/// `Full` tiles the watermark; every other position draws it once.
pub fn watermark_bitmap(
    base: &RgbaImage,
    watermark: &RgbaImage,
    request: &WatermarkRequest,
) -> Result<RgbaImage, WatermarkError> {
    if request.position().is_tiled() {
        Ok(composite_tiled(base, watermark, request.spacing()))
    } else {
        composite_single(base, watermark, request.position(), request.offset())
    }
}

/// Entry point for watermarking encoded images.
#[derive(Clone)]
pub struct WatermarkProcessor {
    codec: Arc<dyn ImageCodec>,
    renderer: Option<Arc<dyn TextRenderer>>,
    animation: AnimationProcessor,
}

impl std::fmt::Debug for WatermarkProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkProcessor")
            .field("has_text_renderer", &self.renderer.is_some())
            .field("frame_strategy", &self.animation.strategy())
            .finish()
    }
}

impl Default for WatermarkProcessor {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WatermarkProcessor {
    pub fn builder() -> WatermarkProcessorBuilder {
        WatermarkProcessorBuilder::default()
    }

    fn resolver(&self) -> WatermarkSourceResolver<'_> {
        WatermarkSourceResolver::new(self.codec.as_ref(), self.renderer.as_deref())
    }

    /// Watermark encoded image data of a known format.
    ///
    /// Static inputs are encoded in the request's output format (PNG when
    /// unset). Animated inputs keep their container format, frame timing,
    /// disposal and loop count.
    pub fn apply(
        &self,
        data: &[u8],
        format: WatermarkImageFormat,
        request: &WatermarkRequest,
    ) -> Result<WatermarkOutput, WatermarkError> {
        let pipeline = route(format);
        let span = crate::logging::watermark_span(format, request.position());
        let _guard = span.enter();
        let start = Instant::now();

        let watermark = self.resolver().resolve(request)?;

        let (output, frames) = match pipeline {
            Pipeline::Static => {
                let base = self.codec.decode(data, format)?;
                let composited = watermark_bitmap(&base, &watermark, request)?;
                let output_format = request.output_format().unwrap_or(WatermarkImageFormat::Png);
                (self.codec.encode(&composited, output_format)?, 1)
            }
            Pipeline::Animated => {
                let animation = self.codec.decode_frames(data, format)?;
                let processed = self
                    .animation
                    .process(&animation, |frame| watermark_bitmap(frame, &watermark, request))?;
                (self.codec.encode_frames(&processed, format)?, processed.len())
            }
        };

        tracing::info!(
            input_format = %format,
            output_format = %output.format,
            pipeline = ?pipeline,
            position = %request.position(),
            watermark_width = watermark.width(),
            watermark_height = watermark.height(),
            frames,
            input_bytes = data.len(),
            output_bytes = output.data.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Watermark applied"
        );

        Ok(output)
    }

    /// Watermark image data, taking the format from a file name's extension.
    pub fn apply_named(
        &self,
        data: &[u8],
        file_name: &str,
        request: &WatermarkRequest,
    ) -> Result<WatermarkOutput, WatermarkError> {
        let format = WatermarkImageFormat::from_path(file_name)?;
        self.apply(data, format, request)
    }

    /// Read `input`, watermark it and write the result to `output`.
    ///
    /// The input format comes from the input extension. For static images
    /// without an explicit output format, the output extension picks the
    /// encoder; an output path with no extension gets PNG.
    pub fn apply_path<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        request: &WatermarkRequest,
    ) -> Result<WatermarkOutput, WatermarkError> {
        let input = input.as_ref();
        let output = output.as_ref();
        let format = WatermarkImageFormat::from_path(input)?;

        let request = match (request.output_format(), output.extension()) {
            (None, Some(_)) if !format.is_animated() => {
                let output_format = WatermarkImageFormat::from_path(output)?;
                request.to_builder().output_format(output_format).build()
            }
            _ => request.clone(),
        };

        let data = std::fs::read(input)?;
        let encoded = self.apply(&data, format, &request)?;
        std::fs::write(output, &encoded.data)?;

        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            "Watermarked file written"
        );
        Ok(encoded)
    }

    /// Watermark an already decoded bitmap
    pub fn apply_bitmap(
        &self,
        base: &RgbaImage,
        request: &WatermarkRequest,
    ) -> Result<RgbaImage, WatermarkError> {
        let watermark = self.resolver().resolve(request)?;
        watermark_bitmap(base, &watermark, request)
    }

    /// Produce the watermark itself as an encoded image.
    ///
    /// Encodes in the request's output format, PNG by default.
    pub fn generate_watermark(
        &self,
        request: &WatermarkRequest,
    ) -> Result<WatermarkOutput, WatermarkError> {
        let watermark = self.resolver().resolve(request)?;
        let format = request.output_format().unwrap_or(WatermarkImageFormat::Png);
        Ok(self.codec.encode(&watermark, format)?)
    }
}

/// Builder for [`WatermarkProcessor`].
#[derive(Default)]
pub struct WatermarkProcessorBuilder {
    codec: Option<Arc<dyn ImageCodec>>,
    renderer: Option<Arc<dyn TextRenderer>>,
    strategy: FrameStrategy,
}

impl WatermarkProcessorBuilder {
    pub fn codec(mut self, codec: Arc<dyn ImageCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn text_renderer(mut self, renderer: Arc<dyn TextRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn frame_strategy(mut self, strategy: FrameStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn build(self) -> WatermarkProcessor {
        WatermarkProcessor {
            codec: self
                .codec
                .unwrap_or_else(|| Arc::new(DefaultCodec::default())),
            renderer: self.renderer,
            animation: AnimationProcessor::new(self.strategy),
        }
    }
}
