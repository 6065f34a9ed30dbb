//! Immutable watermark request.
//!
//! A [`WatermarkRequest`] carries everything one watermark operation needs:
//! the source, text styling, placement, offsets, tile spacing and the output
//! format. It is built once with [`WatermarkRequestBuilder`] and then only
//! read, so it can be shared across threads and reused for many images.

use super::config::{default_font_size, default_rotation, default_spacing, WatermarkPosition};
use super::text_renderer::Color;
use crate::codec::WatermarkImageFormat;
use image::RgbaImage;

/// Where the watermark bitmap comes from.
#[derive(Clone)]
pub enum WatermarkSource {
    /// Text rendered with the request's [`TextStyle`]
    Text(String),
    /// Encoded image bytes (PNG, JPEG, ...), decoded on use
    Encoded(Vec<u8>),
    /// Ready-made RGBA bitmap, used as-is
    Bitmap(RgbaImage),
}

impl std::fmt::Debug for WatermarkSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Encoded(bytes) => write!(f, "Encoded({} bytes)", bytes.len()),
            Self::Bitmap(img) => write!(f, "Bitmap({}x{})", img.width(), img.height()),
        }
    }
}

impl WatermarkSource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Encoded(_) => "encoded",
            Self::Bitmap(_) => "bitmap",
        }
    }
}

/// Styling for text watermarks.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Registered font family; `None` uses the renderer's default font
    pub font_family: Option<String>,
    /// Font size in pixels
    pub font_size: f32,
    /// Fill color including alpha
    pub color: Color,
    /// Clockwise rotation in degrees
    pub rotation: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: default_font_size(),
            color: Color::new(0, 0, 0, 30),
            rotation: default_rotation(),
        }
    }
}

/// Pixel offset added to an anchor position. May be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Gap between adjacent tiles in `Full` placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpacing {
    pub horizontal: u32,
    pub vertical: u32,
}

impl TileSpacing {
    pub fn new(horizontal: u32, vertical: u32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

impl Default for TileSpacing {
    fn default() -> Self {
        Self::new(default_spacing(), default_spacing())
    }
}

/// Everything needed for one watermark operation.
#[derive(Debug, Clone, Default)]
pub struct WatermarkRequest {
    source: Option<WatermarkSource>,
    text_style: TextStyle,
    position: WatermarkPosition,
    offset: Offset,
    spacing: TileSpacing,
    output_format: Option<WatermarkImageFormat>,
}

impl WatermarkRequest {
    pub fn builder() -> WatermarkRequestBuilder {
        WatermarkRequestBuilder::default()
    }

    /// Shorthand for a text watermark with default styling
    pub fn text(text: impl Into<String>) -> Self {
        Self::builder().text(text).build()
    }

    pub fn source(&self) -> Option<&WatermarkSource> {
        self.source.as_ref()
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    pub fn position(&self) -> WatermarkPosition {
        self.position
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn spacing(&self) -> TileSpacing {
        self.spacing
    }

    /// Requested format for static output; `None` means PNG
    pub fn output_format(&self) -> Option<WatermarkImageFormat> {
        self.output_format
    }

    /// Start a builder pre-filled with this request's values
    pub fn to_builder(&self) -> WatermarkRequestBuilder {
        WatermarkRequestBuilder {
            request: self.clone(),
        }
    }
}

/// Builder for [`WatermarkRequest`].
#[derive(Debug, Clone, Default)]
pub struct WatermarkRequestBuilder {
    request: WatermarkRequest,
}

impl WatermarkRequestBuilder {
    pub fn source(mut self, source: WatermarkSource) -> Self {
        self.request.source = Some(source);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.source(WatermarkSource::Text(text.into()))
    }

    /// Use encoded image bytes as the watermark
    pub fn image_bytes(self, bytes: Vec<u8>) -> Self {
        self.source(WatermarkSource::Encoded(bytes))
    }

    pub fn bitmap(self, bitmap: RgbaImage) -> Self {
        self.source(WatermarkSource::Bitmap(bitmap))
    }

    pub fn text_style(mut self, style: TextStyle) -> Self {
        self.request.text_style = style;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.request.text_style.font_family = Some(family.into());
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.request.text_style.font_size = size;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.request.text_style.color = color;
        self
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.request.text_style.rotation = degrees;
        self
    }

    pub fn position(mut self, position: WatermarkPosition) -> Self {
        self.request.position = position;
        self
    }

    pub fn offset(mut self, offset: Offset) -> Self {
        self.request.offset = offset;
        self
    }

    pub fn spacing(mut self, spacing: TileSpacing) -> Self {
        self.request.spacing = spacing;
        self
    }

    pub fn output_format(mut self, format: WatermarkImageFormat) -> Self {
        self.request.output_format = Some(format);
        self
    }

    pub fn build(self) -> WatermarkRequest {
        self.request
    }
}
