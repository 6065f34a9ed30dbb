//! Position calculation for watermark placement.
//!
//! This module works out where a watermark should be placed on an image
//! based on the configured anchor and offsets.
//!
//! # Position Modes
//!
//! - **Anchors**: TopLeft, TopRight, BottomLeft, BottomRight, Center
//! - **Full**: repeating grid across the image, see [`calculate_tiled_positions`]
//!
//! Positions are never clamped. A watermark larger than the image, or pushed
//! by an offset, ends up partly or wholly off-canvas and the off-canvas part
//! is dropped during compositing.
//!
//! # Example
//!
//! ```
//! use watermark_engine::watermark::position::{calculate_position, ImageDimensions, WatermarkDimensions};
//! use watermark_engine::watermark::{Offset, WatermarkPosition};
//!
//! let image = ImageDimensions { width: 800, height: 600 };
//! let watermark = WatermarkDimensions { width: 100, height: 50 };
//!
//! let pos = calculate_position(WatermarkPosition::BottomRight, &image, &watermark, Offset::new(-10, -10)).unwrap();
//! assert_eq!((pos.x, pos.y), (690, 540)); // 800 - 100 - 10, 600 - 50 - 10
//! ```

use super::request::{Offset, TileSpacing};
use super::{WatermarkError, WatermarkPosition};

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn of(image: &image::RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Dimensions of the watermark to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkDimensions {
    pub width: u32,
    pub height: u32,
}

impl WatermarkDimensions {
    pub fn of(image: &image::RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }
}

/// Top-left corner where a watermark should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Calculate the position for a single watermark placement.
///
/// # Arguments
///
/// * `position` - The anchor to place against
/// * `image` - Dimensions of the target image
/// * `watermark` - Dimensions of the watermark
/// * `offset` - Added to the anchor coordinate, may be negative
///
/// # Errors
///
/// `InvalidPlacement` for [`WatermarkPosition::Full`], which has no single
/// position; use [`calculate_tiled_positions`] for it.
pub fn calculate_position(
    position: WatermarkPosition,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
    offset: Offset,
) -> Result<PlacementPosition, WatermarkError> {
    let img_w = image.width as i32;
    let img_h = image.height as i32;
    let wm_w = watermark.width as i32;
    let wm_h = watermark.height as i32;

    // Integer division truncates toward zero, also when the watermark is
    // larger than the image.
    let (x, y) = match position {
        WatermarkPosition::TopLeft => (0, 0),
        WatermarkPosition::TopRight => (img_w - wm_w, 0),
        WatermarkPosition::BottomLeft => (0, img_h - wm_h),
        WatermarkPosition::BottomRight => (img_w - wm_w, img_h - wm_h),
        WatermarkPosition::Center => ((img_w - wm_w) / 2, (img_h - wm_h) / 2),
        WatermarkPosition::Full => {
            return Err(WatermarkError::invalid_placement(
                position.as_str(),
                "tiled placement has no single position",
            ))
        }
    };

    // Huge offsets saturate; the result is simply off-canvas.
    Ok(PlacementPosition::new(
        x.saturating_add(offset.x),
        y.saturating_add(offset.y),
    ))
}

/// Calculate positions for tiled watermark placement.
///
/// Starts at (0, 0) and steps by the watermark size plus spacing until the
/// canvas is covered. A zero-sized watermark with zero spacing would never
/// advance, so the step is at least one pixel.
///
/// # Arguments
///
/// * `canvas` - Area to cover
/// * `watermark` - Dimensions of the watermark
/// * `spacing` - Gap between neighbouring tiles
pub fn calculate_tiled_positions(
    canvas: &ImageDimensions,
    watermark: &WatermarkDimensions,
    spacing: TileSpacing,
) -> Vec<PlacementPosition> {
    let step_x = (watermark.width.saturating_add(spacing.horizontal)).max(1) as usize;
    let step_y = (watermark.height.saturating_add(spacing.vertical)).max(1) as usize;

    (0..canvas.height as i64)
        .step_by(step_y)
        .flat_map(|y| {
            (0..canvas.width as i64)
                .step_by(step_x)
                .map(move |x| PlacementPosition::new(x as i32, y as i32))
        })
        .collect()
}

/// Check if a position is at least partially visible within the image.
pub fn is_visible(
    pos: &PlacementPosition,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
) -> bool {
    let wm_right = pos.x as i64 + watermark.width as i64;
    let wm_bottom = pos.y as i64 + watermark.height as i64;

    (pos.x as i64) < image.width as i64
        && (pos.y as i64) < image.height as i64
        && wm_right > 0
        && wm_bottom > 0
}
