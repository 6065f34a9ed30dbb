// Watermark Engine Library

pub mod codec;
pub mod config;
pub mod logging;
pub mod watermark;
