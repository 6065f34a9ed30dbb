//! Supported image formats and their frame capability
//!
//! The format table is closed: only the extensions listed in
//! [`WatermarkImageFormat::from_extension`] are accepted and everything else
//! is rejected with `UnsupportedFormat`. Capability decides which pipeline a
//! format goes through; only GIF is treated as animated.

use crate::watermark::WatermarkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Image formats understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkImageFormat {
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Gif,
    Webp,
    Bmp,
}

/// Whether a format carries one frame or a timed sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCapability {
    Static,
    Animated,
}

impl WatermarkImageFormat {
    /// Look up a format by file extension.
    ///
    /// Case-insensitive; a leading dot is optional.
    pub fn from_extension(ext: &str) -> Result<Self, WatermarkError> {
        let normalized = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "bmp" => Ok(Self::Bmp),
            "gif" => Ok(Self::Gif),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            _ => Err(WatermarkError::unsupported_format(ext)),
        }
    }

    /// Determine the format from a file name or path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, WatermarkError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| WatermarkError::unsupported_format(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    pub fn capability(&self) -> FrameCapability {
        match self {
            Self::Gif => FrameCapability::Animated,
            Self::Png | Self::Jpeg | Self::Webp | Self::Bmp => FrameCapability::Static,
        }
    }

    pub fn is_animated(&self) -> bool {
        self.capability() == FrameCapability::Animated
    }

    /// Get the MIME content type for this format
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
        }
    }

    /// Map onto the `image` crate's format enum
    pub fn to_image_format(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Gif => image::ImageFormat::Gif,
            Self::Webp => image::ImageFormat::WebP,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
        }
    }
}

impl fmt::Display for WatermarkImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatermarkImageFormat {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}
