//! Watermark configuration types.
//!
//! This module defines the placement enum and the reusable watermark profile
//! loaded from YAML. A profile is never handed to the engine directly; it is
//! turned into an immutable [`WatermarkRequest`] for each operation.
//!
//! ```yaml
//! watermark:
//!   text: "nextstar.space"
//!   font_size: 24
//!   color: "#0000001E"
//!   rotation: 30
//!   position: full
//!   horizontal_spacing: 10
//!   vertical_spacing: 10
//! ```

use super::request::{Offset, TextStyle, TileSpacing, WatermarkRequest, WatermarkSource};
use super::text_renderer::parse_hex_color;
use super::WatermarkError;
use crate::codec::WatermarkImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Default values
pub(crate) fn default_text() -> String {
    "watermark".to_string()
}

pub(crate) fn default_font_size() -> f32 {
    24.0
}

pub(crate) fn default_color() -> String {
    "#0000001E".to_string()
}

pub(crate) fn default_rotation() -> f32 {
    30.0
}

pub(crate) fn default_spacing() -> u32 {
    10
}

/// Watermark position on the image.
///
/// Five single-point anchors plus `Full`, which tiles the watermark across
/// the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    #[default]
    Center,
    /// Repeating tile pattern across the entire image
    Full,
}

impl WatermarkPosition {
    pub const ALL: [WatermarkPosition; 6] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::Center,
        Self::Full,
    ];

    pub fn is_tiled(&self) -> bool {
        matches!(self, Self::Full)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Center => "center",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for WatermarkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatermarkPosition {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| {
                WatermarkError::invalid_placement(
                    s,
                    "expected one of top-left, top-right, bottom-left, bottom-right, center, full",
                )
            })
    }
}

/// Reusable watermark profile.
///
/// Every field has a default, so an empty `watermark:` section yields the
/// stock text watermark centred on the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Text drawn when no watermark image is supplied
    #[serde(default = "default_text")]
    pub text: String,

    /// Registered font family; the renderer's default font when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,

    /// Font size in pixels (default: 24)
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Text color as hex string, `#RRGGBBAA` for alpha (default: "#0000001E")
    #[serde(default = "default_color")]
    pub color: String,

    /// Text rotation in degrees, clockwise (default: 30)
    #[serde(default = "default_rotation")]
    pub rotation: f32,

    #[serde(default)]
    pub position: WatermarkPosition,

    /// Horizontal offset added to the anchor position
    #[serde(default)]
    pub offset_x: i32,

    /// Vertical offset added to the anchor position
    #[serde(default)]
    pub offset_y: i32,

    /// Gap between tiles in `full` mode
    #[serde(default = "default_spacing")]
    pub horizontal_spacing: u32,

    #[serde(default = "default_spacing")]
    pub vertical_spacing: u32,

    /// Output format for static images (default: png)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<WatermarkImageFormat>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: default_text(),
            font_family: None,
            font_size: default_font_size(),
            color: default_color(),
            rotation: default_rotation(),
            position: WatermarkPosition::default(),
            offset_x: 0,
            offset_y: 0,
            horizontal_spacing: default_spacing(),
            vertical_spacing: default_spacing(),
            output_format: None,
        }
    }
}

impl WatermarkConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(format!(
                "watermark font_size must be positive, got {}",
                self.font_size
            ));
        }
        if !self.rotation.is_finite() {
            return Err("watermark rotation must be a finite number".to_string());
        }
        parse_hex_color(&self.color).map_err(|e| format!("watermark color: {}", e))?;
        Ok(())
    }

    /// Text style described by this profile
    pub fn text_style(&self) -> Result<TextStyle, WatermarkError> {
        Ok(TextStyle {
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            color: parse_hex_color(&self.color)?,
            rotation: self.rotation,
        })
    }

    /// Snapshot the profile into a request.
    ///
    /// `source` overrides the profile's text; pass `None` to watermark with
    /// the configured text.
    pub fn to_request(
        &self,
        source: Option<WatermarkSource>,
    ) -> Result<WatermarkRequest, WatermarkError> {
        let source = source.unwrap_or_else(|| WatermarkSource::Text(self.text.clone()));
        let mut builder = WatermarkRequest::builder()
            .source(source)
            .text_style(self.text_style()?)
            .position(self.position)
            .offset(Offset::new(self.offset_x, self.offset_y))
            .spacing(TileSpacing::new(
                self.horizontal_spacing,
                self.vertical_spacing,
            ));
        if let Some(format) = self.output_format {
            builder = builder.output_format(format);
        }
        Ok(builder.build())
    }
}
