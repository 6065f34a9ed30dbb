//! Path based processing: read, watermark, write

use super::test_harness::*;
use std::fs;
use tempfile::TempDir;
use watermark_engine::codec::{ImageCodec, WatermarkImageFormat};
use watermark_engine::watermark::{
    LoopCount, WatermarkError, WatermarkPosition, WatermarkProcessor, WatermarkRequest,
};

fn request() -> WatermarkRequest {
    WatermarkRequest::builder()
        .image_bytes(red_png(5, 5))
        .position(WatermarkPosition::TopRight)
        .build()
}

#[test]
fn test_apply_path_writes_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("photo-marked.png");
    fs::write(&input, blank_image(30, 20, WatermarkImageFormat::Png)).unwrap();

    let encoded = WatermarkProcessor::default()
        .apply_path(&input, &output, &request())
        .unwrap();

    let written = fs::read(&output).unwrap();
    assert_eq!(written, encoded.data);
    let image = decode(&written, WatermarkImageFormat::Png);
    assert_eq!(image.dimensions(), (30, 20));
    assert_eq!(image.get_pixel(25, 0), &RED);
    assert_eq!(image.get_pixel(24, 0), &WHITE);
}

#[test]
fn test_apply_path_output_extension_picks_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("photo.jpg");
    fs::write(&input, blank_image(30, 20, WatermarkImageFormat::Png)).unwrap();

    let encoded = WatermarkProcessor::default()
        .apply_path(&input, &output, &request())
        .unwrap();
    assert_eq!(encoded.format, WatermarkImageFormat::Jpeg);
    assert!(fs::read(&output).unwrap().starts_with(&[0xFF, 0xD8]));
}

#[test]
fn test_apply_path_gif_stays_gif() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("anim.gif");
    let output = dir.path().join("anim-marked.gif");
    fs::write(&input, blank_gif(20, 20, &[100, 200], LoopCount::Infinite)).unwrap();

    WatermarkProcessor::default()
        .apply_path(&input, &output, &request())
        .unwrap();

    let animation = codec()
        .decode_frames(&fs::read(&output).unwrap(), WatermarkImageFormat::Gif)
        .unwrap();
    assert_eq!(animation.len(), 2);
}

#[test]
fn test_apply_path_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = WatermarkProcessor::default()
        .apply_path(
            dir.path().join("missing.png"),
            dir.path().join("out.png"),
            &request(),
        )
        .unwrap_err();
    assert!(matches!(err, WatermarkError::Io(_)));
}

#[test]
fn test_apply_path_unsupported_input_extension() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("scan.tiff");
    fs::write(&input, b"whatever").unwrap();

    let err = WatermarkProcessor::default()
        .apply_path(&input, dir.path().join("out.png"), &request())
        .unwrap_err();
    assert!(matches!(err, WatermarkError::UnsupportedFormat { .. }));
}
