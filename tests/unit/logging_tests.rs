// Logging initialisation tests

use watermark_engine::codec::WatermarkImageFormat;
use watermark_engine::config::{LogFormat, LoggingConfig};
use watermark_engine::logging::{init_subscriber, init_with, watermark_span};
use watermark_engine::watermark::WatermarkPosition;

#[test]
fn test_can_initialize_subscriber_repeatedly() {
    assert!(init_subscriber().is_ok());
    assert!(init_with(&LoggingConfig {
        level: "warn".to_string(),
        format: LogFormat::Json,
    })
    .is_ok());
}

#[test]
fn test_events_inside_watermark_span() {
    let _ = init_subscriber();
    let span = watermark_span(WatermarkImageFormat::Png, WatermarkPosition::Center);
    let _guard = span.enter();
    tracing::info!(frames = 1, "Watermark applied");
}
