//! Watermark compositing for static and animated images.
//!
//! A [`WatermarkRequest`] describes what to draw (text, an encoded image or a
//! bitmap) and where. [`WatermarkProcessor`] decodes the input, composites the
//! watermark and re-encodes the result, dispatching animated formats to a
//! per-frame pipeline that keeps timing and loop metadata intact.
//!
//! # Example
//!
//! ```no_run
//! use watermark_engine::codec::WatermarkImageFormat;
//! use watermark_engine::watermark::{WatermarkPosition, WatermarkProcessor, WatermarkRequest};
//!
//! # fn run(input: &[u8], logo: Vec<u8>) -> Result<(), watermark_engine::watermark::WatermarkError> {
//! let request = WatermarkRequest::builder()
//!     .image_bytes(logo)
//!     .position(WatermarkPosition::BottomRight)
//!     .build();
//! let output = WatermarkProcessor::default().apply(input, WatermarkImageFormat::Png, &request)?;
//! assert_eq!(output.content_type, "image/png");
//! # Ok(())
//! # }
//! ```

pub mod animation;
pub mod compositor;
pub mod config;
pub mod error;
pub mod position;
pub mod processor;
pub mod request;
pub mod source;
pub mod text_renderer;

pub use animation::{AnimatedImage, AnimationProcessor, Disposal, Frame, FrameStrategy, LoopCount};
pub use compositor::{composite_single, composite_tiled};
pub use config::{WatermarkConfig, WatermarkPosition};
pub use error::WatermarkError;
pub use position::{
    calculate_position, calculate_tiled_positions, is_visible, ImageDimensions,
    PlacementPosition, WatermarkDimensions,
};
pub use processor::{
    route, watermark_bitmap, Pipeline, WatermarkOutput, WatermarkProcessor,
    WatermarkProcessorBuilder,
};
pub use request::{
    Offset, TextStyle, TileSpacing, WatermarkRequest, WatermarkRequestBuilder, WatermarkSource,
};
pub use source::WatermarkSourceResolver;
pub use text_renderer::{parse_hex_color, Color, GlyphTextRenderer, TextRenderer};
