//! Frame-by-frame processing of animated images.
//!
//! An [`AnimatedImage`] is an ordered list of full-canvas frames plus a loop
//! count. [`AnimationProcessor`] maps a compositing function over every frame
//! and rebuilds the sequence with the original timing, disposal and loop
//! count. Frames may run on the rayon pool; results are always collected by
//! index so output order matches input order.

use super::WatermarkError;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// How the previous frame is treated before the next one is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposal {
    /// No disposal specified by the encoder
    #[default]
    Unspecified,
    /// Leave the frame in place
    Keep,
    /// Clear the frame area to the background
    Background,
    /// Restore what was there before the frame
    Previous,
}

/// Number of times an animation repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopCount {
    /// Repeat forever (stored as `0` in the container)
    #[default]
    Infinite,
    /// Repeat a fixed number of times. `Finite(0)` plays once with no loop
    /// extension written.
    Finite(u16),
}

impl LoopCount {
    /// Container representation where `0` means forever
    pub fn as_count(&self) -> u16 {
        match self {
            LoopCount::Infinite => 0,
            LoopCount::Finite(n) => *n,
        }
    }
}

impl From<u16> for LoopCount {
    fn from(count: u16) -> Self {
        if count == 0 {
            LoopCount::Infinite
        } else {
            LoopCount::Finite(count)
        }
    }
}

/// A single full-canvas frame of an animation.
#[derive(Clone)]
pub struct Frame {
    pub buffer: RgbaImage,
    pub delay: Duration,
    pub disposal: Disposal,
}

impl Frame {
    pub fn new(buffer: RgbaImage, delay: Duration) -> Self {
        Self {
            buffer,
            delay,
            disposal: Disposal::Unspecified,
        }
    }

    pub fn with_disposal(mut self, disposal: Disposal) -> Self {
        self.disposal = disposal;
        self
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("dimensions", &(self.buffer.width(), self.buffer.height()))
            .field("delay", &self.delay)
            .field("disposal", &self.disposal)
            .finish()
    }
}

/// Ordered frame sequence with its loop count.
#[derive(Debug, Clone, Default)]
pub struct AnimatedImage {
    pub frames: Vec<Frame>,
    pub loop_count: LoopCount,
}

impl AnimatedImage {
    pub fn new(frames: Vec<Frame>, loop_count: LoopCount) -> Self {
        Self { frames, loop_count }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Canvas size, taken from the first frame
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| f.buffer.dimensions())
    }
}

/// Scheduling of per-frame work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStrategy {
    Sequential,
    #[default]
    Parallel,
}

/// Applies a per-frame function to an animation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationProcessor {
    strategy: FrameStrategy,
}

impl AnimationProcessor {
    pub fn new(strategy: FrameStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> FrameStrategy {
        self.strategy
    }

    /// Run `f` over every frame and reassemble the sequence.
    ///
    /// Output frame `i` is `f(input[i])` with input `i`'s delay and disposal.
    /// The first error aborts the whole operation.
    ///
    /// # Errors
    ///
    /// `EmptyAnimation` when the input has no frames, or whatever `f` returns.
    pub fn process<F>(
        &self,
        animation: &AnimatedImage,
        f: F,
    ) -> Result<AnimatedImage, WatermarkError>
    where
        F: Fn(&RgbaImage) -> Result<RgbaImage, WatermarkError> + Sync,
    {
        if animation.is_empty() {
            return Err(WatermarkError::EmptyAnimation);
        }

        let start = Instant::now();
        let process_frame = |(index, frame): (usize, &Frame)| -> Result<Frame, WatermarkError> {
            tracing::debug!(frame = index, "Watermarking frame");
            Ok(Frame {
                buffer: f(&frame.buffer)?,
                delay: frame.delay,
                disposal: frame.disposal,
            })
        };

        let frames = match self.strategy {
            FrameStrategy::Sequential => animation
                .frames
                .iter()
                .enumerate()
                .map(process_frame)
                .collect::<Result<Vec<_>, _>>()?,
            FrameStrategy::Parallel => {
                use rayon::prelude::*;

                animation
                    .frames
                    .par_iter()
                    .enumerate()
                    .map(process_frame)
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        tracing::debug!(
            frames = frames.len(),
            strategy = ?self.strategy,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Animation frames processed"
        );

        Ok(AnimatedImage {
            frames,
            loop_count: animation.loop_count,
        })
    }
}
