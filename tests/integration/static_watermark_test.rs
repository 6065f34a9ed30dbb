//! Static image watermarking, end to end
//!
//!   encoded bytes → decode → composite → encode

use super::test_harness::*;
use image::Rgba;
use watermark_engine::codec::WatermarkImageFormat;
use watermark_engine::watermark::{
    Offset, TileSpacing, WatermarkError, WatermarkPosition, WatermarkProcessor, WatermarkRequest,
};

#[test]
fn test_png_bottom_right_watermark() {
    let request = WatermarkRequest::builder()
        .image_bytes(red_png(20, 20))
        .position(WatermarkPosition::BottomRight)
        .build();

    let output = WatermarkProcessor::default()
        .apply(
            &blank_image(100, 100, WatermarkImageFormat::Png),
            WatermarkImageFormat::Png,
            &request,
        )
        .unwrap();

    assert_eq!(output.format, WatermarkImageFormat::Png);
    assert_eq!(output.content_type, "image/png");
    let image = decode(&output.data, WatermarkImageFormat::Png);
    assert_eq!(image.dimensions(), (100, 100));
    assert_eq!(image.get_pixel(80, 80), &RED);
    assert_eq!(image.get_pixel(99, 99), &RED);
    assert_eq!(image.get_pixel(79, 80), &WHITE);
    assert_eq!(image.get_pixel(0, 0), &WHITE);
}

#[test]
fn test_offset_moves_watermark() {
    let request = WatermarkRequest::builder()
        .image_bytes(red_png(10, 10))
        .position(WatermarkPosition::TopLeft)
        .offset(Offset::new(15, 5))
        .build();

    let output = WatermarkProcessor::default()
        .apply(
            &blank_image(50, 50, WatermarkImageFormat::Png),
            WatermarkImageFormat::Png,
            &request,
        )
        .unwrap();

    let image = decode(&output.data, WatermarkImageFormat::Png);
    assert_eq!(image.get_pixel(15, 5), &RED);
    assert_eq!(image.get_pixel(24, 14), &RED);
    assert_eq!(image.get_pixel(14, 5), &WHITE);
    assert_eq!(image.get_pixel(25, 14), &WHITE);
}

#[test]
fn test_full_position_tiles_the_image() {
    let request = WatermarkRequest::builder()
        .image_bytes(red_png(10, 10))
        .position(WatermarkPosition::Full)
        .spacing(TileSpacing::new(10, 10))
        .build();

    let output = WatermarkProcessor::default()
        .apply(
            &blank_image(100, 100, WatermarkImageFormat::Png),
            WatermarkImageFormat::Png,
            &request,
        )
        .unwrap();

    let image = decode(&output.data, WatermarkImageFormat::Png);
    assert_eq!(image.dimensions(), (100, 100));
    let tiles = (0..100)
        .step_by(20)
        .flat_map(|y| (0..100).step_by(20).map(move |x| (x, y)))
        .filter(|&(x, y)| image.get_pixel(x, y) == &RED)
        .count();
    assert_eq!(tiles, 25);
    assert_eq!(image.get_pixel(15, 15), &WHITE);
}

#[test]
fn test_semi_transparent_watermark_blends() {
    let mark = image::RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 128]));
    let request = WatermarkRequest::builder()
        .bitmap(mark)
        .position(WatermarkPosition::Center)
        .build();

    let output = WatermarkProcessor::default()
        .apply(
            &blank_image(8, 8, WatermarkImageFormat::Png),
            WatermarkImageFormat::Png,
            &request,
        )
        .unwrap();

    let image = decode(&output.data, WatermarkImageFormat::Png);
    let blended = image.get_pixel(4, 4);
    assert!((126..=128).contains(&blended[0]), "got {:?}", blended);
    assert_eq!(blended[3], 255);
    assert_eq!(image.get_pixel(0, 0), &WHITE);
}

#[test]
fn test_jpeg_input_defaults_to_png_output() {
    let request = WatermarkRequest::builder()
        .image_bytes(red_png(8, 8))
        .build();

    let output = WatermarkProcessor::default()
        .apply(
            &blank_image(64, 48, WatermarkImageFormat::Jpeg),
            WatermarkImageFormat::Jpeg,
            &request,
        )
        .unwrap();

    assert_eq!(output.format, WatermarkImageFormat::Png);
    assert_eq!(
        decode(&output.data, WatermarkImageFormat::Png).dimensions(),
        (64, 48)
    );
}

#[test]
fn test_requested_output_formats() {
    let cases = [
        (WatermarkImageFormat::Jpeg, &[0xFF, 0xD8][..]),
        (WatermarkImageFormat::Bmp, &b"BM"[..]),
        (WatermarkImageFormat::Webp, &b"RIFF"[..]),
        (WatermarkImageFormat::Gif, &b"GIF8"[..]),
    ];

    for (format, magic) in cases {
        let request = WatermarkRequest::builder()
            .image_bytes(red_png(4, 4))
            .output_format(format)
            .build();
        let output = WatermarkProcessor::default()
            .apply(
                &blank_image(32, 32, WatermarkImageFormat::Png),
                WatermarkImageFormat::Png,
                &request,
            )
            .unwrap();
        assert_eq!(output.format, format);
        assert_eq!(output.content_type, format.content_type());
        assert!(output.data.starts_with(magic), "{} magic bytes", format);
    }
}

#[test]
fn test_webp_input_is_static() {
    let request = WatermarkRequest::builder()
        .image_bytes(red_png(4, 4))
        .position(WatermarkPosition::TopLeft)
        .build();

    let output = WatermarkProcessor::default()
        .apply(
            &blank_image(16, 16, WatermarkImageFormat::Webp),
            WatermarkImageFormat::Webp,
            &request,
        )
        .unwrap();

    assert_eq!(output.format, WatermarkImageFormat::Png);
    let image = decode(&output.data, WatermarkImageFormat::Png);
    assert_eq!(image.get_pixel(0, 0), &RED);
}

#[test]
fn test_oversized_watermark_is_clipped() {
    let request = WatermarkRequest::builder()
        .image_bytes(red_png(200, 200))
        .position(WatermarkPosition::Center)
        .build();

    let output = WatermarkProcessor::default()
        .apply(
            &blank_image(50, 50, WatermarkImageFormat::Png),
            WatermarkImageFormat::Png,
            &request,
        )
        .unwrap();

    let image = decode(&output.data, WatermarkImageFormat::Png);
    assert_eq!(image.dimensions(), (50, 50));
    assert!(image.pixels().all(|p| *p == RED));
}

#[test]
fn test_unsupported_extension_rejected() {
    let request = WatermarkRequest::builder().image_bytes(red_png(4, 4)).build();
    let err = WatermarkProcessor::default()
        .apply_named(
            &blank_image(8, 8, WatermarkImageFormat::Png),
            "photo.tiff",
            &request,
        )
        .unwrap_err();
    assert!(matches!(err, WatermarkError::UnsupportedFormat { .. }));
}

#[test]
fn test_corrupt_input_rejected() {
    let request = WatermarkRequest::builder().image_bytes(red_png(4, 4)).build();
    let err = WatermarkProcessor::default()
        .apply(b"\x89PNG not really", WatermarkImageFormat::Png, &request)
        .unwrap_err();
    assert!(matches!(err, WatermarkError::DecodeFailure { .. }));
}

#[test]
fn test_corrupt_watermark_rejected() {
    let request = WatermarkRequest::builder()
        .image_bytes(b"nope".to_vec())
        .build();
    let err = WatermarkProcessor::default()
        .apply(
            &blank_image(8, 8, WatermarkImageFormat::Png),
            WatermarkImageFormat::Png,
            &request,
        )
        .unwrap_err();
    assert!(matches!(err, WatermarkError::DecodeFailure { .. }));
}
