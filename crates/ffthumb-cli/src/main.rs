//! `ffthumb` binary.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, Instrument};

use ffthumb_cli::cli::{Cli, Commands};
use ffthumb_cli::logging::{init_tracing, operation_span};
use ffthumb_media::{check_ffmpeg, check_ffprobe, FrameExtractor, MediaConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    // The optimization switch and timeouts are read here and nowhere else.
    let config = MediaConfig::from_env();
    info!("Media config: {:?}", config);

    match run(cli.command, FrameExtractor::new(config)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, extractor: FrameExtractor) -> anyhow::Result<()> {
    match command {
        Commands::Thumbnail(args) => {
            let span = operation_span("thumbnail", &args.video);
            let plan = extractor
                .try_capture_thumbnail(&args.video, &args.image, &args.options())
                .instrument(span)
                .await
                .with_context(|| format!("thumbnail capture failed for {}", args.video.display()))?;
            info!(strategy = plan.strategy(), "Wrote {}", args.image.display());
        }
        Commands::Audio(args) => {
            let span = operation_span("audio", &args.video);
            extractor
                .try_extract_audio(&args.video, &args.output, &args.options())
                .instrument(span)
                .await
                .with_context(|| format!("audio extraction failed for {}", args.video.display()))?;
            info!("Wrote {}", args.output.display());
        }
        Commands::Subtitle(args) => {
            let span = operation_span("subtitle", &args.video);
            extractor
                .try_extract_subtitle(&args.video, &args.output, &args.options())
                .instrument(span)
                .await
                .with_context(|| {
                    format!("subtitle extraction failed for {}", args.video.display())
                })?;
            info!("Wrote {}", args.output.display());
        }
        Commands::Probe(args) => {
            let span = operation_span("probe", &args.video);
            let metadata = extractor
                .try_get_metadata(&args.video, args.timeout.map(Duration::from_secs))
                .instrument(span)
                .await
                .with_context(|| format!("metadata unavailable for {}", args.video.display()))?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Commands::Check => {
            let ffmpeg = check_ffmpeg().context("ffmpeg is required")?;
            let ffprobe = check_ffprobe().context("ffprobe is required")?;
            println!("ffmpeg: {}", ffmpeg.display());
            println!("ffprobe: {}", ffprobe.display());
        }
    }

    Ok(())
}
