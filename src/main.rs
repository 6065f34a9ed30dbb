use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use watermark_engine::codec::WatermarkImageFormat;
use watermark_engine::config::Config;
use watermark_engine::watermark::{WatermarkPosition, WatermarkSource};

/// Watermark Engine - stamp text or image watermarks onto PNG, JPEG, GIF, WEBP and BMP files
#[derive(Parser, Debug)]
#[command(name = "watermark-engine")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Font file used as the default font, overriding the configuration
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watermark an image file
    Apply(ApplyArgs),

    /// Render a text watermark to an image file
    Generate {
        /// Watermark text
        #[arg(short, long)]
        text: String,

        /// Output file; the extension picks the format
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Print the resolved configuration as JSON and exit
    ShowConfig,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Image to watermark
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the watermarked image
    #[arg(short, long)]
    output: PathBuf,

    /// Watermark image file
    #[arg(long, conflicts_with = "text")]
    image: Option<PathBuf>,

    /// Watermark text (defaults to the configured text)
    #[arg(long)]
    text: Option<String>,

    /// top-left, top-right, bottom-left, bottom-right, center or full
    #[arg(long)]
    position: Option<WatermarkPosition>,

    #[arg(long, allow_hyphen_values = true)]
    offset_x: Option<i32>,

    #[arg(long, allow_hyphen_values = true)]
    offset_y: Option<i32>,

    /// Horizontal gap between tiles in full mode
    #[arg(long)]
    horizontal_spacing: Option<u32>,

    /// Vertical gap between tiles in full mode
    #[arg(long)]
    vertical_spacing: Option<u32>,

    /// Output format for static images
    #[arg(long)]
    format: Option<WatermarkImageFormat>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(font) = &cli.font {
        config.fonts.default = Some(font.clone());
    }
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;
    Ok(config)
}

fn apply(mut config: Config, args: ApplyArgs) -> Result<()> {
    let profile = &mut config.watermark;
    if let Some(position) = args.position {
        profile.position = position;
    }
    if let Some(x) = args.offset_x {
        profile.offset_x = x;
    }
    if let Some(y) = args.offset_y {
        profile.offset_y = y;
    }
    if let Some(h) = args.horizontal_spacing {
        profile.horizontal_spacing = h;
    }
    if let Some(v) = args.vertical_spacing {
        profile.vertical_spacing = v;
    }
    if let Some(format) = args.format {
        profile.output_format = Some(format);
    }

    let source = match (&args.image, args.text) {
        (Some(path), _) => Some(WatermarkSource::Encoded(
            std::fs::read(path)
                .with_context(|| format!("Failed to read watermark image {}", path.display()))?,
        )),
        (None, Some(text)) => Some(WatermarkSource::Text(text)),
        (None, None) => None,
    };

    let request = config.watermark.to_request(source)?;
    let processor = config.processor().map_err(anyhow::Error::msg)?;
    let output = processor
        .apply_path(&args.input, &args.output, &request)
        .with_context(|| format!("Failed to watermark {}", args.input.display()))?;

    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        format = %output.format,
        bytes = output.data.len(),
        "Watermarked image written"
    );
    Ok(())
}

fn generate(config: Config, text: String, output: &Path) -> Result<()> {
    let mut request = config
        .watermark
        .to_request(Some(WatermarkSource::Text(text)))?;
    if output.extension().is_some() {
        let format = WatermarkImageFormat::from_path(output)?;
        request = request.to_builder().output_format(format).build();
    }

    let processor = config.processor().map_err(anyhow::Error::msg)?;
    let encoded = processor
        .generate_watermark(&request)
        .context("Failed to render watermark (is a font configured?)")?;
    std::fs::write(output, &encoded.data)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        output = %output.display(),
        format = %encoded.format,
        bytes = encoded.data.len(),
        "Watermark generated"
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    watermark_engine::logging::init_with(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging subsystem: {}", e))?;

    tracing::debug!(
        config_file = ?cli.config,
        position = %config.watermark.position,
        frame_strategy = ?config.processing.frame_strategy,
        quality = config.processing.quality,
        "Configuration loaded successfully"
    );

    match cli.command {
        Command::Apply(args) => apply(config, args),
        Command::Generate { text, output } => generate(config, text, &output),
        Command::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
