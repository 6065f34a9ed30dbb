//! Animated GIF watermarking, end to end
//!
//!   GIF bytes → frames → composite each frame → GIF bytes

use super::test_harness::*;
use std::time::Duration;
use watermark_engine::codec::{ImageCodec, WatermarkImageFormat};
use watermark_engine::watermark::{
    FrameStrategy, LoopCount, TileSpacing, WatermarkPosition, WatermarkProcessor,
    WatermarkRequest,
};

fn processor(strategy: FrameStrategy) -> WatermarkProcessor {
    WatermarkProcessor::builder().frame_strategy(strategy).build()
}

#[test]
fn test_gif_keeps_frames_timing_and_loop() {
    for strategy in [FrameStrategy::Parallel, FrameStrategy::Sequential] {
        let input = blank_gif(40, 30, &[100, 150, 100], LoopCount::Infinite);
        let request = WatermarkRequest::builder()
            .image_bytes(red_png(10, 10))
            .position(WatermarkPosition::BottomRight)
            .build();

        let output = processor(strategy)
            .apply(&input, WatermarkImageFormat::Gif, &request)
            .unwrap();
        assert_eq!(output.format, WatermarkImageFormat::Gif);
        assert_eq!(output.content_type, "image/gif");

        let animation = codec()
            .decode_frames(&output.data, WatermarkImageFormat::Gif)
            .unwrap();
        assert_eq!(animation.len(), 3);
        assert_eq!(animation.loop_count, LoopCount::Infinite);
        let delays: Vec<Duration> = animation.frames.iter().map(|f| f.delay).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(100),
                Duration::from_millis(150),
                Duration::from_millis(100)
            ]
        );

        for frame in &animation.frames {
            assert_eq!(frame.buffer.dimensions(), (40, 30));
            assert!(is_reddish(frame.buffer.get_pixel(35, 25)));
            assert!(is_whiteish(frame.buffer.get_pixel(5, 5)));
        }
    }
}

#[test]
fn test_gif_keeps_finite_loop_count() {
    let input = blank_gif(16, 16, &[50, 50], LoopCount::Finite(3));
    let request = WatermarkRequest::builder()
        .image_bytes(red_png(4, 4))
        .build();

    let output = WatermarkProcessor::default()
        .apply(&input, WatermarkImageFormat::Gif, &request)
        .unwrap();
    let animation = codec()
        .decode_frames(&output.data, WatermarkImageFormat::Gif)
        .unwrap();
    assert_eq!(animation.len(), 2);
    assert_eq!(animation.loop_count, LoopCount::Finite(3));
}

#[test]
fn test_gif_ignores_static_output_format() {
    let input = blank_gif(16, 16, &[100], LoopCount::Infinite);
    let request = WatermarkRequest::builder()
        .image_bytes(red_png(4, 4))
        .output_format(WatermarkImageFormat::Jpeg)
        .build();

    let output = WatermarkProcessor::default()
        .apply(&input, WatermarkImageFormat::Gif, &request)
        .unwrap();
    assert_eq!(output.format, WatermarkImageFormat::Gif);
    assert!(output.data.starts_with(b"GIF8"));
}

#[test]
fn test_gif_tiled_every_frame() {
    let input = blank_gif(60, 60, &[80, 80, 80, 80], LoopCount::Infinite);
    let request = WatermarkRequest::builder()
        .image_bytes(red_png(10, 10))
        .position(WatermarkPosition::Full)
        .spacing(TileSpacing::new(10, 10))
        .build();

    let output = WatermarkProcessor::default()
        .apply(&input, WatermarkImageFormat::Gif, &request)
        .unwrap();
    let animation = codec()
        .decode_frames(&output.data, WatermarkImageFormat::Gif)
        .unwrap();
    assert_eq!(animation.len(), 4);
    for frame in &animation.frames {
        assert!(is_reddish(frame.buffer.get_pixel(0, 0)));
        assert!(is_reddish(frame.buffer.get_pixel(20, 40)));
        assert!(is_whiteish(frame.buffer.get_pixel(15, 15)));
    }
}

#[test]
fn test_single_frame_gif_goes_through_animated_path() {
    let input = blank_gif(12, 12, &[70], LoopCount::Infinite);
    let request = WatermarkRequest::builder()
        .image_bytes(red_png(2, 2))
        .position(WatermarkPosition::TopLeft)
        .build();

    let output = WatermarkProcessor::default()
        .apply(&input, WatermarkImageFormat::Gif, &request)
        .unwrap();
    let animation = codec()
        .decode_frames(&output.data, WatermarkImageFormat::Gif)
        .unwrap();
    assert_eq!(animation.len(), 1);
    assert_eq!(animation.frames[0].delay, Duration::from_millis(70));
    assert!(is_reddish(animation.frames[0].buffer.get_pixel(0, 0)));
}
