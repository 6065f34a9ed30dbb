// Logging module for structured logging using the tracing crate

use std::error::Error;

use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::codec::WatermarkImageFormat;
use crate::config::{LogFormat, LoggingConfig};
use crate::watermark::WatermarkPosition;

/// Initialize the tracing subscriber with the default logging settings
///
/// JSON lines at `info`, unless `RUST_LOG` says otherwise.
///
/// # Examples
///
/// ```
/// use watermark_engine::logging::init_subscriber;
///
/// init_subscriber().expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber() -> Result<(), Box<dyn Error>> {
    init_with(&LoggingConfig::default())
}

/// Initialize the tracing subscriber from a logging config.
///
/// `RUST_LOG` takes precedence over `config.level`. Output goes to stderr so
/// stdout stays free for command output. If a global subscriber is already
/// installed this does nothing.
///
/// # Errors
///
/// Returns an error when `config.level` is not a valid filter directive.
pub fn init_with(config: &LoggingConfig) -> Result<(), Box<dyn Error>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let fmt_layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    if Registry::default()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }

    Ok(())
}

/// Span wrapping one watermark operation
pub fn watermark_span(format: WatermarkImageFormat, position: WatermarkPosition) -> Span {
    tracing::info_span!("watermark", format = %format, position = %position)
}
