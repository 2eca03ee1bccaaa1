//! FFmpeg CLI wrapper for media-library plugins.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - A process runner with timeouts and typed failures
//! - Thumbnail capture with a two-stage seek and precise-seek fallback
//! - Audio and subtitle track extraction
//! - Pass-through ffprobe metadata
//! - A facade collapsing failures to `bool`/`Option` for simple callers

pub mod audio;
pub mod command;
pub mod config;
pub mod error;
pub mod extractor;
pub mod probe;
pub mod request;
pub mod subtitle;
pub mod thumbnail;

pub use audio::extract_audio;
pub use command::{
    check_ffmpeg, check_ffprobe, CommandExecutor, CommandPlan, FfmpegCommand, FfmpegRunner,
    ProcessOutput,
};
pub use config::MediaConfig;
pub use error::{MediaError, MediaResult};
pub use extractor::FrameExtractor;
pub use probe::{get_metadata, Metadata};
pub use request::{ThumbnailOptions, ThumbnailRequest, TrackOptions, TrackRequest};
pub use subtitle::extract_subtitle;
pub use thumbnail::{capture_thumbnail, plan_seek, SeekPlan, SeekPosition};
