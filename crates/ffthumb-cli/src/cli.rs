//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use ffthumb_media::{ThumbnailOptions, TrackOptions};

/// Thumbnails, track extraction and metadata via ffmpeg/ffprobe.
#[derive(Debug, Parser)]
#[command(name = "ffthumb", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Capture a single frame as an image
    Thumbnail(ThumbnailArgs),
    /// Extract an audio track as 16 kHz mono WAV
    Audio(TrackArgs),
    /// Extract a subtitle track
    Subtitle(TrackArgs),
    /// Print ffprobe container/stream metadata as JSON
    Probe(ProbeArgs),
    /// Verify that ffmpeg and ffprobe are on PATH
    Check,
}

/// Optimization override shared by the ffmpeg subcommands.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ModeArgs {
    /// Use the legacy command shapes for this call
    #[arg(long, conflicts_with = "optimized")]
    pub legacy: bool,

    /// Force the optimized command shapes for this call
    #[arg(long)]
    pub optimized: bool,
}

impl ModeArgs {
    /// Per-call override; `None` defers to `FFMPEG_OPTIMIZATIONS`.
    pub fn optimizations(&self) -> Option<bool> {
        match (self.legacy, self.optimized) {
            (true, _) => Some(false),
            (_, true) => Some(true),
            _ => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct ThumbnailArgs {
    /// Source video
    pub video: PathBuf,
    /// Destination image
    pub image: PathBuf,

    /// Frame timestamp (HH:MM:SS[.ms], MM:SS or SS)
    #[arg(short, long)]
    pub timestamp: Option<String>,

    /// Decode threads
    #[arg(long)]
    pub threads: Option<u32>,

    /// Seconds decoded precisely after the keyframe seek
    #[arg(long)]
    pub preseek_offset: Option<f64>,

    /// Timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub mode: ModeArgs,
}

impl ThumbnailArgs {
    pub fn options(&self) -> ThumbnailOptions {
        ThumbnailOptions {
            timestamp: self.timestamp.clone(),
            threads: self.threads,
            preseek_offset: self.preseek_offset,
            timeout: self.timeout.map(Duration::from_secs),
            optimizations: self.mode.optimizations(),
        }
    }
}

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Source video
    pub video: PathBuf,
    /// Destination file
    pub output: PathBuf,

    /// Track ordinal among streams of this kind
    #[arg(short, long)]
    pub stream: Option<u32>,

    /// Decode threads
    #[arg(long)]
    pub threads: Option<u32>,

    /// Timeout in seconds (optimized mode only)
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub mode: ModeArgs,
}

impl TrackArgs {
    pub fn options(&self) -> TrackOptions {
        TrackOptions {
            stream_index: self.stream,
            threads: self.threads,
            timeout: self.timeout.map(Duration::from_secs),
            optimizations: self.mode.optimizations(),
        }
    }
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Media file to inspect
    pub video: PathBuf,

    /// Timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}
