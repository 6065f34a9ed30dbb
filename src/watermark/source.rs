//! Resolution of the watermark bitmap for a request.
//!
//! The watermark is either supplied by the caller (a bitmap or encoded
//! bytes) or rendered from text. Explicit images always win over text, since
//! a request holds exactly one source.

use super::request::{WatermarkRequest, WatermarkSource};
use super::text_renderer::TextRenderer;
use super::WatermarkError;
use crate::codec::ImageCodec;
use image::RgbaImage;
use std::borrow::Cow;

/// Produces the watermark bitmap described by a request.
pub struct WatermarkSourceResolver<'a> {
    codec: &'a dyn ImageCodec,
    renderer: Option<&'a dyn TextRenderer>,
}

impl<'a> WatermarkSourceResolver<'a> {
    pub fn new(codec: &'a dyn ImageCodec, renderer: Option<&'a dyn TextRenderer>) -> Self {
        Self { codec, renderer }
    }

    /// Resolve the request's source into an RGBA bitmap.
    ///
    /// Supplied bitmaps are borrowed unchanged.
    ///
    /// # Errors
    ///
    /// - `EmptyWatermarkSource` when there is no source or the text is blank
    /// - `DecodeFailure` when encoded watermark bytes cannot be decoded
    /// - `RenderFailure` when text needs rendering but no renderer is set
    pub fn resolve<'r>(
        &self,
        request: &'r WatermarkRequest,
    ) -> Result<Cow<'r, RgbaImage>, WatermarkError> {
        match request.source() {
            None => Err(WatermarkError::EmptyWatermarkSource),
            Some(WatermarkSource::Bitmap(bitmap)) => Ok(Cow::Borrowed(bitmap)),
            Some(WatermarkSource::Encoded(bytes)) => {
                if bytes.is_empty() {
                    return Err(WatermarkError::EmptyWatermarkSource);
                }
                let bitmap = self.codec.decode_any(bytes)?;
                Ok(Cow::Owned(bitmap))
            }
            Some(WatermarkSource::Text(text)) => {
                if text.trim().is_empty() {
                    return Err(WatermarkError::EmptyWatermarkSource);
                }
                let renderer = self.renderer.ok_or_else(|| {
                    WatermarkError::render_failed("no text renderer configured")
                })?;
                let bitmap = renderer.render(text, request.text_style())?;
                tracing::debug!(
                    width = bitmap.width(),
                    height = bitmap.height(),
                    font_size = request.text_style().font_size,
                    rotation = request.text_style().rotation,
                    "Rendered text watermark"
                );
                Ok(Cow::Owned(bitmap))
            }
        }
    }
}
