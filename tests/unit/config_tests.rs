// Configuration loading through the public API

use std::io::Write;
use tempfile::NamedTempFile;
use watermark_engine::config::{Config, LogFormat};
use watermark_engine::watermark::{FrameStrategy, WatermarkPosition};

#[test]
fn test_minimal_yaml_fills_defaults() {
    let config = Config::from_yaml_with_env("watermark:\n  position: full\n").unwrap();
    assert_eq!(config.watermark.position, WatermarkPosition::Full);
    assert_eq!(config.watermark.text, "watermark");
    assert_eq!(config.watermark.font_size, 24.0);
    assert_eq!(config.watermark.color, "#0000001E");
    assert_eq!(config.watermark.rotation, 30.0);
    assert_eq!(config.watermark.horizontal_spacing, 10);
    assert_eq!(config.watermark.vertical_spacing, 10);
    assert_eq!(config.processing.frame_strategy, FrameStrategy::Parallel);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_underscore_position_accepted_by_parser() {
    let position: WatermarkPosition = "bottom_left".parse().unwrap();
    assert_eq!(position, WatermarkPosition::BottomLeft);
    assert!("middle".parse::<WatermarkPosition>().is_err());
}

#[test]
fn test_config_from_file_builds_processor() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
processing:
  frame_strategy: sequential
  quality: 90
"#,
    )
    .unwrap();
    file.flush().unwrap();

    let config = Config::from_file(file.path()).unwrap();
    config.validate().unwrap();
    assert!(config.processor().is_ok());
}

#[test]
fn test_invalid_values_fail_validation() {
    let config = Config::from_yaml_with_env("watermark:\n  font_size: -2\n").unwrap();
    assert!(config.validate().is_err());

    let config = Config::from_yaml_with_env("processing:\n  quality: 0\n").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_unknown_frame_strategy_rejected() {
    assert!(Config::from_yaml_with_env("processing:\n  frame_strategy: turbo\n").is_err());
}

#[test]
fn test_config_serializes_to_json() {
    let json = serde_json::to_value(Config::default()).unwrap();
    assert_eq!(json["watermark"]["position"], "center");
    assert_eq!(json["processing"]["frame_strategy"], "parallel");
    assert_eq!(json["logging"]["format"], "json");
}
