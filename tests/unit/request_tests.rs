// Request construction and placement arithmetic through the public API

use image::{Rgba, RgbaImage};
use watermark_engine::codec::WatermarkImageFormat;
use watermark_engine::watermark::{
    calculate_position, calculate_tiled_positions, parse_hex_color, Color, ImageDimensions,
    Offset, PlacementPosition, TileSpacing, WatermarkConfig, WatermarkDimensions,
    WatermarkPosition, WatermarkRequest, WatermarkSource,
};

#[test]
fn test_request_is_reusable_snapshot() {
    let request = WatermarkRequest::builder()
        .bitmap(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 4])))
        .position(WatermarkPosition::BottomLeft)
        .offset(Offset::new(-3, 7))
        .build();

    let changed = request
        .to_builder()
        .position(WatermarkPosition::TopRight)
        .build();

    assert_eq!(request.position(), WatermarkPosition::BottomLeft);
    assert_eq!(changed.position(), WatermarkPosition::TopRight);
    assert_eq!(changed.offset(), Offset::new(-3, 7));
    assert_eq!(changed.source().map(|s| s.kind()), Some("bitmap"));
}

#[test]
fn test_profile_to_request() {
    let config = WatermarkConfig {
        text: "Draft".to_string(),
        color: "#FF000080".to_string(),
        position: WatermarkPosition::Full,
        horizontal_spacing: 4,
        vertical_spacing: 6,
        output_format: Some(WatermarkImageFormat::Webp),
        ..WatermarkConfig::default()
    };

    let request = config.to_request(None).unwrap();
    assert!(matches!(request.source(), Some(WatermarkSource::Text(t)) if t == "Draft"));
    assert_eq!(request.text_style().color, Color::new(255, 0, 0, 128));
    assert_eq!(request.spacing(), TileSpacing::new(4, 6));
    assert_eq!(request.output_format(), Some(WatermarkImageFormat::Webp));

    let with_image = config
        .to_request(Some(WatermarkSource::Encoded(vec![1, 2, 3])))
        .unwrap();
    assert_eq!(with_image.source().map(|s| s.kind()), Some("encoded"));
}

#[test]
fn test_profile_with_bad_color_fails() {
    let config = WatermarkConfig {
        color: "#12".to_string(),
        ..WatermarkConfig::default()
    };
    assert!(config.to_request(None).is_err());
}

#[test]
fn test_hex_color_forms() {
    assert_eq!(parse_hex_color("#F00").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(parse_hex_color("#00FF00").unwrap(), Color::rgb(0, 255, 0));
    assert_eq!(
        parse_hex_color("#0000001E").unwrap(),
        Color::new(0, 0, 0, 30)
    );
    assert!(parse_hex_color("blue").is_err());
}

#[test]
fn test_anchor_positions() {
    let image = ImageDimensions {
        width: 100,
        height: 80,
    };
    let watermark = WatermarkDimensions {
        width: 20,
        height: 10,
    };
    let cases = [
        (WatermarkPosition::TopLeft, (0, 0)),
        (WatermarkPosition::TopRight, (80, 0)),
        (WatermarkPosition::BottomLeft, (0, 70)),
        (WatermarkPosition::BottomRight, (80, 70)),
        (WatermarkPosition::Center, (40, 35)),
    ];
    for (position, (x, y)) in cases {
        let pos = calculate_position(position, &image, &watermark, Offset::new(1, -1)).unwrap();
        assert_eq!(pos, PlacementPosition::new(x + 1, y - 1), "{}", position);
    }
    assert!(calculate_position(
        WatermarkPosition::Full,
        &image,
        &watermark,
        Offset::default()
    )
    .is_err());
}

#[test]
fn test_tiles_cover_canvas() {
    let positions = calculate_tiled_positions(
        &ImageDimensions {
            width: 50,
            height: 30,
        },
        &WatermarkDimensions {
            width: 10,
            height: 10,
        },
        TileSpacing::new(5, 0),
    );
    // columns at 0, 15, 30, 45 and rows at 0, 10, 20
    assert_eq!(positions.len(), 12);
    assert_eq!(positions[0], PlacementPosition::new(0, 0));
    assert_eq!(positions[3], PlacementPosition::new(45, 0));
    assert_eq!(positions[11], PlacementPosition::new(45, 20));
}
