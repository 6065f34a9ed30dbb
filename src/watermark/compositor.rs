//! Watermark compositor for blending watermarks onto images.
//!
//! This module handles alpha blending of watermark images onto target images
//! at calculated positions, either once at an anchor or tiled over the
//! whole canvas.
//!
//! Both entry points leave their inputs untouched and return a new buffer
//! with the base image's dimensions. Watermark pixels that fall outside the
//! canvas are dropped.
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use watermark_engine::watermark::compositor::composite_single;
//! use watermark_engine::watermark::{Offset, WatermarkPosition};
//!
//! let base = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
//! let mark = RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 255]));
//!
//! let out = composite_single(&base, &mark, WatermarkPosition::BottomRight, Offset::default()).unwrap();
//! assert_eq!(out.get_pixel(90, 90), &Rgba([255, 0, 0, 255]));
//! ```

use super::position::{
    calculate_position, calculate_tiled_positions, is_visible, ImageDimensions,
    PlacementPosition, WatermarkDimensions,
};
use super::request::{Offset, TileSpacing};
use super::{WatermarkError, WatermarkPosition};
use image::{Rgba, RgbaImage};

/// Draw one watermark at an anchor position.
///
/// # Errors
///
/// `InvalidPlacement` for [`WatermarkPosition::Full`]; tiling goes through
/// [`composite_tiled`].
pub fn composite_single(
    base: &RgbaImage,
    watermark: &RgbaImage,
    position: WatermarkPosition,
    offset: Offset,
) -> Result<RgbaImage, WatermarkError> {
    let image_dims = ImageDimensions::of(base);
    let wm_dims = WatermarkDimensions::of(watermark);

    let pos = calculate_position(position, &image_dims, &wm_dims, offset)?;
    if !is_visible(&pos, &image_dims, &wm_dims) {
        tracing::warn!(
            x = pos.x,
            y = pos.y,
            image_width = image_dims.width,
            image_height = image_dims.height,
            "Watermark lies entirely outside the image"
        );
    }

    let mut target = base.clone();
    blend_layer(&mut target, watermark, pos);
    Ok(target)
}

/// Repeat the watermark across the whole image.
///
/// The watermark is drawn on a working canvas one watermark larger than
/// the base in each direction, starting at (0, 0) with a pitch of the
/// watermark size plus spacing. The canvas is then cropped back to the base
/// size, so the last row and column may be partial tiles.
pub fn composite_tiled(
    base: &RgbaImage,
    watermark: &RgbaImage,
    spacing: TileSpacing,
) -> RgbaImage {
    let (width, height) = base.dimensions();
    let (wm_width, wm_height) = watermark.dimensions();

    if wm_width == 0 || wm_height == 0 {
        return base.clone();
    }

    let canvas_dims = ImageDimensions {
        width: width.saturating_add(wm_width),
        height: height.saturating_add(wm_height),
    };
    let mut canvas = RgbaImage::new(canvas_dims.width, canvas_dims.height);
    copy_into(&mut canvas, base);

    let positions =
        calculate_tiled_positions(&canvas_dims, &WatermarkDimensions::of(watermark), spacing);
    tracing::debug!(
        tiles = positions.len(),
        horizontal_spacing = spacing.horizontal,
        vertical_spacing = spacing.vertical,
        "Tiling watermark"
    );

    for pos in positions {
        blend_layer(&mut canvas, watermark, pos);
    }

    image::imageops::crop_imm(&canvas, 0, 0, width, height).to_image()
}

/// Copy `source` into the top-left corner of `target`
fn copy_into(target: &mut RgbaImage, source: &RgbaImage) {
    for (x, y, pixel) in source.enumerate_pixels() {
        target.put_pixel(x, y, *pixel);
    }
}

/// Blend a watermark onto the target with its top-left corner at `position`.
fn blend_layer(target: &mut RgbaImage, watermark: &RgbaImage, position: PlacementPosition) {
    let target_width = target.width() as i64;
    let target_height = target.height() as i64;

    let px = position.x as i64;
    let py = position.y as i64;

    // Calculate the visible region (clamp to target bounds)
    let x_start = px.max(0);
    let y_start = py.max(0);
    let x_end = (px + watermark.width() as i64).min(target_width);
    let y_end = (py + watermark.height() as i64).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wm_pixel = watermark.get_pixel((tx - px) as u32, (ty - py) as u32);
            let target_pixel = target.get_pixel_mut(tx as u32, ty as u32);
            *target_pixel = blend_pixels(*target_pixel, *wm_pixel);
        }
    }
}

/// Blend two straight-alpha pixels with the Porter-Duff "over" operator.
///
/// A fully transparent foreground leaves the background untouched and a
/// fully opaque one replaces it exactly.
pub(crate) fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    match foreground[3] {
        0 => return background,
        255 => return foreground,
        _ => {}
    }

    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
