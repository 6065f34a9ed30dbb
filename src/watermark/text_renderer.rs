//! Text watermark rendering.
//!
//! This module renders text watermarks to RGBA images that can be
//! composited onto target images.
//!
//! # Features
//!
//! - Hex color parsing (#RGB, #RRGGBB and #RRGGBBAA formats)
//! - Configurable font size, color alpha and rotation
//! - Named font families registered up front (no system font discovery)
//!
//! # Example
//!
//! ```ignore
//! use watermark_engine::watermark::text_renderer::{GlyphTextRenderer, TextRenderer};
//! use watermark_engine::watermark::TextStyle;
//!
//! let renderer = GlyphTextRenderer::from_file("fonts/DejaVuSans.ttf")?;
//! let image = renderer.render("Copyright 2025", &TextStyle::default())?;
//! ```

use super::compositor::blend_pixels;
use super::request::TextStyle;
use super::WatermarkError;
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::Path;

/// Parsed RGBA color from hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Parse a hex color string into RGBA components.
///
/// Supports #RGB, #RRGGBB and #RRGGBBAA. Colors without an alpha component
/// are fully opaque.
///
/// # Examples
///
/// ```ignore
/// let white = parse_hex_color("#FFF").unwrap();
/// assert_eq!(white, Color::rgb(255, 255, 255));
///
/// let faint_black = parse_hex_color("#0000001E").unwrap();
/// assert_eq!(faint_black, Color::new(0, 0, 0, 30));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::render_failed("Color must start with '#'"))?;

    if !hex.is_ascii() {
        return Err(WatermarkError::render_failed("Invalid hex digit"));
    }

    let component = |s: &str| {
        u8::from_str_radix(s, 16).map_err(|_| WatermarkError::render_failed("Invalid hex digit"))
    };

    match hex.len() {
        3 => {
            // #RGB format - each digit doubled: 0xF -> 0xFF
            let r = component(&hex[0..1])?;
            let g = component(&hex[1..2])?;
            let b = component(&hex[2..3])?;
            Ok(Color::rgb(r * 17, g * 17, b * 17))
        }
        6 => Ok(Color::rgb(
            component(&hex[0..2])?,
            component(&hex[2..4])?,
            component(&hex[4..6])?,
        )),
        8 => Ok(Color::new(
            component(&hex[0..2])?,
            component(&hex[2..4])?,
            component(&hex[4..6])?,
            component(&hex[6..8])?,
        )),
        _ => Err(WatermarkError::render_failed(format!(
            "Color must be #RGB, #RRGGBB or #RRGGBBAA format, got {} characters",
            hex.len()
        ))),
    }
}

/// Turns text into a watermark bitmap.
pub trait TextRenderer: Send + Sync {
    /// Render `text` with `style`, returning a tightly sized RGBA image with
    /// a transparent background.
    fn render(&self, text: &str, style: &TextStyle) -> Result<RgbaImage, WatermarkError>;
}

/// [`TextRenderer`] backed by `ab_glyph` outlines.
#[derive(Clone)]
pub struct GlyphTextRenderer {
    default_font: FontArc,
    families: HashMap<String, FontArc>,
}

impl std::fmt::Debug for GlyphTextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut families: Vec<&String> = self.families.keys().collect();
        families.sort();
        f.debug_struct("GlyphTextRenderer")
            .field("families", &families)
            .finish()
    }
}

impl GlyphTextRenderer {
    pub fn new(default_font: FontArc) -> Self {
        Self {
            default_font,
            families: HashMap::new(),
        }
    }

    /// Build from raw TrueType/OpenType bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, WatermarkError> {
        Ok(Self::new(load_font(data)?))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WatermarkError> {
        Ok(Self::new(load_font_file(path)?))
    }

    /// Register a font under a family name. Names are matched case-insensitively.
    pub fn with_family(mut self, name: impl AsRef<str>, font: FontArc) -> Self {
        self.families.insert(name.as_ref().to_lowercase(), font);
        self
    }

    pub fn with_family_file<P: AsRef<Path>>(
        self,
        name: impl AsRef<str>,
        path: P,
    ) -> Result<Self, WatermarkError> {
        let font = load_font_file(path)?;
        Ok(self.with_family(name, font))
    }

    pub fn has_family(&self, name: &str) -> bool {
        self.families.contains_key(&name.to_lowercase())
    }

    /// Font for a family name; unknown or missing names fall back to the default
    fn font_for(&self, family: Option<&str>) -> &FontArc {
        match family {
            Some(name) => self.families.get(&name.to_lowercase()).unwrap_or_else(|| {
                tracing::debug!(family = name, "Font family not registered, using default font");
                &self.default_font
            }),
            None => &self.default_font,
        }
    }

    /// Calculate the dimensions of rendered, unrotated text.
    ///
    /// Returns (width, height) in pixels.
    pub fn measure_text(&self, text: &str, style: &TextStyle) -> (u32, u32) {
        let font = self.font_for(style.font_family.as_deref());
        measure_text(font, text, style.font_size)
    }
}

impl TextRenderer for GlyphTextRenderer {
    fn render(&self, text: &str, style: &TextStyle) -> Result<RgbaImage, WatermarkError> {
        if text.is_empty() {
            return Err(WatermarkError::render_failed("Cannot render empty text"));
        }
        if !(style.font_size.is_finite() && style.font_size > 0.0) {
            return Err(WatermarkError::render_failed(format!(
                "Font size must be positive, got {}",
                style.font_size
            )));
        }

        let font = self.font_for(style.font_family.as_deref());
        let image = draw_text(font, text, style);

        let degrees = style.rotation % 360.0;
        if degrees.abs() < f32::EPSILON {
            Ok(image)
        } else {
            Ok(rotate_image(&image, degrees))
        }
    }
}

fn load_font(data: Vec<u8>) -> Result<FontArc, WatermarkError> {
    FontArc::try_from_vec(data)
        .map_err(|e| WatermarkError::render_failed(format!("Invalid font data: {}", e)))
}

fn load_font_file<P: AsRef<Path>>(path: P) -> Result<FontArc, WatermarkError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        WatermarkError::render_failed(format!("Failed to read font {}: {}", path.display(), e))
    })?;
    load_font(data)
}

fn measure_text(font: &FontArc, text: &str, font_size: f32) -> (u32, u32) {
    let scaled_font = font.as_scaled(PxScale::from(font_size));

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }

        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    let height = scaled_font.height();

    // Small padding so anti-aliased edges are not clipped
    let padding = 2;
    (
        width.ceil().max(0.0) as u32 + padding,
        height.ceil().max(0.0) as u32 + padding,
    )
}

/// Draw text horizontally onto a transparent canvas sized to fit it.
fn draw_text(font: &FontArc, text: &str, style: &TextStyle) -> RgbaImage {
    let scale = PxScale::from(style.font_size);
    let scaled_font = font.as_scaled(scale);

    let (width, height) = measure_text(font, text, style.font_size);
    let canvas_width = width.max(1);
    let canvas_height = height.max(1);
    let mut image = RgbaImage::new(canvas_width, canvas_height);

    let baseline_y = 1.0 + scaled_font.ascent();
    let mut cursor_x = 1.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && y >= 0 && x < canvas_width as i32 && y < canvas_height as i32 {
                    let pixel_alpha = (coverage.clamp(0.0, 1.0) * style.color.a as f32).round();
                    let pixel = Rgba([
                        style.color.r,
                        style.color.g,
                        style.color.b,
                        pixel_alpha as u8,
                    ]);

                    // Overlapping glyph edges accumulate coverage
                    let existing = *image.get_pixel(x as u32, y as u32);
                    image.put_pixel(x as u32, y as u32, blend_pixels(existing, pixel));
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    image
}

/// Size of the bounding box of a `width` x `height` rectangle rotated by `degrees`.
pub fn rotated_size(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let radians = degrees.to_radians();
    let cos = radians.cos().abs();
    let sin = radians.sin().abs();
    let w = width as f32;
    let h = height as f32;

    (
        ((w * cos + h * sin) - 1e-3).ceil().max(1.0) as u32,
        ((w * sin + h * cos) - 1e-3).ceil().max(1.0) as u32,
    )
}

/// Rotate an image by the specified degrees (clockwise) about its centre.
///
/// The output is the bounding box of the rotated image, transparent outside
/// the rotated content, sampled with bilinear interpolation.
fn rotate_image(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let radians = degrees.to_radians();

    let src_w = image.width() as f32;
    let src_h = image.height() as f32;
    let cx = src_w / 2.0;
    let cy = src_h / 2.0;

    let (dst_w, dst_h) = rotated_size(image.width(), image.height(), degrees);
    let mut rotated = RgbaImage::new(dst_w, dst_h);

    let dst_cx = dst_w as f32 / 2.0;
    let dst_cy = dst_h as f32 / 2.0;

    // Inverse rotation maps destination pixels back into the source
    let inv_cos = (-radians).cos();
    let inv_sin = (-radians).sin();

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let rx = dx as f32 + 0.5 - dst_cx;
            let ry = dy as f32 + 0.5 - dst_cy;

            let sx = rx * inv_cos - ry * inv_sin + cx - 0.5;
            let sy = rx * inv_sin + ry * inv_cos + cy - 0.5;

            if let Some(pixel) = sample_bilinear(image, sx, sy) {
                rotated.put_pixel(dx, dy, pixel);
            }
        }
    }

    rotated
}

/// Bilinear sample; pixels outside the source count as transparent.
fn sample_bilinear(image: &RgbaImage, sx: f32, sy: f32) -> Option<Rgba<u8>> {
    let w = image.width() as i64;
    let h = image.height() as i64;
    if sx <= -1.0 || sy <= -1.0 || sx >= w as f32 || sy >= h as f32 {
        return None;
    }

    let x0 = sx.floor() as i64;
    let y0 = sy.floor() as i64;
    let fx = sx - x0 as f32;
    let fy = sy - y0 as f32;

    let fetch = |x: i64, y: i64| -> [f32; 4] {
        if x < 0 || y < 0 || x >= w || y >= h {
            [0.0; 4]
        } else {
            let p = image.get_pixel(x as u32, y as u32);
            [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
        }
    };

    let p00 = fetch(x0, y0);
    let p10 = fetch(x0 + 1, y0);
    let p01 = fetch(x0, y0 + 1);
    let p11 = fetch(x0 + 1, y0 + 1);

    let weights = [
        (1.0 - fx) * (1.0 - fy),
        fx * (1.0 - fy),
        (1.0 - fx) * fy,
        fx * fy,
    ];

    // Weight color by alpha so transparent neighbours do not darken edges
    let alpha: f32 = [p00[3], p10[3], p01[3], p11[3]]
        .iter()
        .zip(weights.iter())
        .map(|(a, w)| a * w)
        .sum();
    if alpha < 0.5 {
        return None;
    }

    let channel = |c: usize| -> u8 {
        let v = (p00[c] * p00[3] * weights[0]
            + p10[c] * p10[3] * weights[1]
            + p01[c] * p01[3] * weights[2]
            + p11[c] * p11[3] * weights[3])
            / alpha;
        v.round().clamp(0.0, 255.0) as u8
    };

    Some(Rgba([
        channel(0),
        channel(1),
        channel(2),
        alpha.round().clamp(0.0, 255.0) as u8,
    ]))
}
