//! Animated GIF decoding and encoding
//!
//! Pixels come from the `image` crate's GIF decoder, which coalesces every
//! frame onto the full logical screen. The loop count and per-frame disposal
//! are not exposed there, so a second metadata-only pass reads them with the
//! `gif` crate. Encoding goes straight through the `gif` crate so disposal
//! and repeat can be written back.

use super::error::CodecError;
use crate::watermark::animation::{AnimatedImage, Disposal, Frame, LoopCount};
use image::AnimationDecoder;
use std::io::Cursor;
use std::time::Duration;

/// Quantizer speed passed to `gif::Frame::from_rgba_speed` (1 best, 30 fastest)
const QUANTIZE_SPEED: i32 = 10;

/// Per-frame metadata collected from the `gif` crate
struct FrameInfo {
    disposal: Disposal,
}

/// Decode every frame of a GIF into full-canvas RGBA buffers.
pub fn decode_gif_frames(data: &[u8]) -> Result<AnimatedImage, CodecError> {
    use image::codecs::gif::GifDecoder;

    let (infos, loop_count) = read_gif_metadata(data)?;

    let decoder =
        GifDecoder::new(Cursor::new(data)).map_err(|e| CodecError::decode_failed(e.to_string()))?;
    let decoded = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| CodecError::decode_failed(e.to_string()))?;

    if decoded.len() != infos.len() {
        return Err(CodecError::decode_failed(format!(
            "frame count mismatch: {} decoded, {} described",
            decoded.len(),
            infos.len()
        )));
    }

    let frames = decoded
        .into_iter()
        .zip(infos)
        .map(|(frame, info)| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom == 0 { 0 } else { numer / denom };
            Frame {
                buffer: frame.into_buffer(),
                delay: Duration::from_millis(delay_ms as u64),
                disposal: info.disposal,
            }
        })
        .collect();

    Ok(AnimatedImage::new(frames, loop_count))
}

/// Walk the frame headers without decoding pixel data.
fn read_gif_metadata(data: &[u8]) -> Result<(Vec<FrameInfo>, LoopCount), CodecError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);

    let mut decoder = options
        .read_info(Cursor::new(data))
        .map_err(|e| CodecError::decode_failed(e.to_string()))?;

    let mut infos = Vec::new();
    while let Some(frame) = decoder
        .next_frame_info()
        .map_err(|e| CodecError::decode_failed(e.to_string()))?
    {
        infos.push(FrameInfo {
            disposal: disposal_from_gif(frame.dispose),
        });
    }

    // The NETSCAPE loop extension may follow the first frame, so repeat is
    // only final once every frame header has been read.
    let loop_count = match decoder.repeat() {
        gif::Repeat::Infinite => LoopCount::Infinite,
        gif::Repeat::Finite(n) => LoopCount::Finite(n),
    };

    Ok((infos, loop_count))
}

/// Encode an animation as GIF, keeping delays, disposal and loop count.
pub fn encode_gif_frames(animation: &AnimatedImage) -> Result<Vec<u8>, CodecError> {
    let (width, height) = animation
        .dimensions()
        .ok_or_else(|| CodecError::encode_failed("gif", "animation has no frames"))?;
    let width = to_gif_dimension(width)?;
    let height = to_gif_dimension(height)?;

    let mut output = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut output, width, height, &[])
            .map_err(|e| CodecError::encode_failed("gif", e.to_string()))?;

        match animation.loop_count {
            LoopCount::Infinite => encoder
                .set_repeat(gif::Repeat::Infinite)
                .map_err(|e| CodecError::encode_failed("gif", e.to_string()))?,
            LoopCount::Finite(0) => {}
            LoopCount::Finite(n) => encoder
                .set_repeat(gif::Repeat::Finite(n))
                .map_err(|e| CodecError::encode_failed("gif", e.to_string()))?,
        }

        for (index, frame) in animation.frames.iter().enumerate() {
            if frame.buffer.dimensions() != (width as u32, height as u32) {
                return Err(CodecError::encode_failed(
                    "gif",
                    format!(
                        "frame {} is {}x{}, expected {}x{}",
                        index,
                        frame.buffer.width(),
                        frame.buffer.height(),
                        width,
                        height
                    ),
                ));
            }

            let mut pixels = frame.buffer.as_raw().clone();
            let mut gif_frame =
                gif::Frame::from_rgba_speed(width, height, &mut pixels, QUANTIZE_SPEED);
            gif_frame.delay = delay_to_centiseconds(frame.delay);
            gif_frame.dispose = disposal_to_gif(frame.disposal);

            encoder
                .write_frame(&gif_frame)
                .map_err(|e| CodecError::encode_failed("gif", e.to_string()))?;
        }
    }

    Ok(output)
}

fn to_gif_dimension(value: u32) -> Result<u16, CodecError> {
    u16::try_from(value).map_err(|_| {
        CodecError::encode_failed("gif", format!("dimension {} exceeds 65535", value))
    })
}

/// GIF stores delays in hundredths of a second
fn delay_to_centiseconds(delay: Duration) -> u16 {
    let centis = (delay.as_millis() + 5) / 10;
    centis.min(u16::MAX as u128) as u16
}

fn disposal_from_gif(method: gif::DisposalMethod) -> Disposal {
    match method {
        gif::DisposalMethod::Any => Disposal::Unspecified,
        gif::DisposalMethod::Keep => Disposal::Keep,
        gif::DisposalMethod::Background => Disposal::Background,
        gif::DisposalMethod::Previous => Disposal::Previous,
    }
}

fn disposal_to_gif(disposal: Disposal) -> gif::DisposalMethod {
    match disposal {
        Disposal::Unspecified => gif::DisposalMethod::Any,
        Disposal::Keep => gif::DisposalMethod::Keep,
        Disposal::Background => gif::DisposalMethod::Background,
        Disposal::Previous => gif::DisposalMethod::Previous,
    }
}
