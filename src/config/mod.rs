// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::codec::{DefaultCodec, EncoderQuality};
use crate::watermark::{
    FrameStrategy, GlyphTextRenderer, WatermarkConfig, WatermarkProcessor,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub watermark: WatermarkConfig,
    #[serde(default)]
    pub fonts: FontConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Font files available to the text renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Font used when a request names no family or an unknown one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<PathBuf>,

    /// Family name to font file
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub families: BTreeMap<String, PathBuf>,
}

fn default_quality() -> u8 {
    100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// How animation frames are composited (default: parallel)
    #[serde(default)]
    pub frame_strategy: FrameStrategy,

    /// Lossy encoder quality, 1-100 (default: 100)
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            frame_strategy: FrameStrategy::default(),
            quality: default_quality(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        if substituted.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.watermark.validate()?;

        if !(1..=100).contains(&self.processing.quality) {
            return Err(format!(
                "processing quality must be between 1 and 100, got {}",
                self.processing.quality
            ));
        }

        if self.fonts.families.keys().any(|name| name.trim().is_empty()) {
            return Err("font family names cannot be empty".to_string());
        }
        if !self.fonts.families.is_empty() && self.fonts.default.is_none() {
            return Err("fonts.default is required when font families are configured".to_string());
        }

        tracing_subscriber::EnvFilter::try_new(&self.logging.level)
            .map_err(|e| format!("invalid logging level '{}': {}", self.logging.level, e))?;

        Ok(())
    }

    /// Load the configured fonts.
    ///
    /// Returns `Ok(None)` when no default font is configured.
    pub fn text_renderer(&self) -> Result<Option<GlyphTextRenderer>, String> {
        let Some(default) = &self.fonts.default else {
            return Ok(None);
        };

        let mut renderer = GlyphTextRenderer::from_file(default)
            .map_err(|e| format!("Failed to load font {}: {}", default.display(), e))?;
        for (family, path) in &self.fonts.families {
            renderer = renderer
                .with_family_file(family, path)
                .map_err(|e| format!("Failed to load font family '{}': {}", family, e))?;
        }
        Ok(Some(renderer))
    }

    /// Processor wired with the configured quality, frame strategy and fonts
    pub fn processor(&self) -> Result<WatermarkProcessor, String> {
        let codec = DefaultCodec::new(EncoderQuality::with_quality(self.processing.quality));
        let mut builder = WatermarkProcessor::builder()
            .codec(Arc::new(codec))
            .frame_strategy(self.processing.frame_strategy);
        if let Some(renderer) = self.text_renderer()? {
            builder = builder.text_renderer(Arc::new(renderer));
        }
        Ok(builder.build())
    }
}
