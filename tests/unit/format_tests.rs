// Format table and routing tests

use watermark_engine::codec::{FrameCapability, WatermarkImageFormat};
use watermark_engine::watermark::{route, Pipeline, WatermarkError};

#[test]
fn test_every_supported_extension_resolves() {
    let table = [
        ("bmp", WatermarkImageFormat::Bmp, "image/bmp"),
        ("gif", WatermarkImageFormat::Gif, "image/gif"),
        ("png", WatermarkImageFormat::Png, "image/png"),
        ("webp", WatermarkImageFormat::Webp, "image/webp"),
        ("jpeg", WatermarkImageFormat::Jpeg, "image/jpeg"),
        ("jpg", WatermarkImageFormat::Jpeg, "image/jpeg"),
    ];
    for (ext, format, content_type) in table {
        assert_eq!(WatermarkImageFormat::from_extension(ext).unwrap(), format);
        assert_eq!(
            WatermarkImageFormat::from_extension(&ext.to_uppercase()).unwrap(),
            format
        );
        assert_eq!(format.content_type(), content_type);
    }
}

#[test]
fn test_only_gif_is_animated() {
    for format in [
        WatermarkImageFormat::Bmp,
        WatermarkImageFormat::Png,
        WatermarkImageFormat::Webp,
        WatermarkImageFormat::Jpeg,
    ] {
        assert_eq!(format.capability(), FrameCapability::Static);
        assert_eq!(route(format), Pipeline::Static);
    }
    assert_eq!(
        WatermarkImageFormat::Gif.capability(),
        FrameCapability::Animated
    );
    assert_eq!(route(WatermarkImageFormat::Gif), Pipeline::Animated);
}

#[test]
fn test_unknown_extensions_rejected() {
    for ext in ["tiff", "svg", "", "png2"] {
        let err = WatermarkImageFormat::from_extension(ext).unwrap_err();
        assert!(matches!(err, WatermarkError::UnsupportedFormat { .. }));
    }
}

#[test]
fn test_from_path_uses_extension() {
    assert_eq!(
        WatermarkImageFormat::from_path("/tmp/photos/cat.JPG").unwrap(),
        WatermarkImageFormat::Jpeg
    );
    assert!(WatermarkImageFormat::from_path("/tmp/no_extension").is_err());
}

#[test]
fn test_format_parses_from_str() {
    let format: WatermarkImageFormat = "webp".parse().unwrap();
    assert_eq!(format, WatermarkImageFormat::Webp);
    assert_eq!(format.to_string(), "webp");
}
