//! Per-call extraction requests.
//!
//! Callers describe a call with an `*Options` value in which every field is
//! optional; resolving it against a [`MediaConfig`] yields an immutable
//! request with no further lookups left to do.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ffthumb_models::defaults::DEFAULT_THUMBNAIL_TIMESTAMP;
use ffthumb_models::StreamSelector;

use crate::config::MediaConfig;
use crate::error::{MediaError, MediaResult};

/// Timeout for one invocation: optimized shapes are always bounded, legacy
/// shapes follow `legacy_timeout`.
fn resolve_timeout(
    optimizations: bool,
    requested: Option<Duration>,
    config: &MediaConfig,
) -> Option<Duration> {
    if optimizations {
        Some(requested.unwrap_or(config.timeout))
    } else {
        config.legacy_timeout
    }
}

/// Thread cap for one invocation. `-threads 0` means "ffmpeg decides", so a
/// per-call 0 resolves to the configured cap.
fn resolve_threads(requested: Option<u32>, config: &MediaConfig) -> u32 {
    requested.filter(|t| *t > 0).unwrap_or(config.threads)
}

pub(crate) fn require_path(path: &Path, what: &str) -> MediaResult<()> {
    if path.as_os_str().is_empty() {
        return Err(MediaError::invalid_input(format!("{} path is empty", what)));
    }
    Ok(())
}

/// Optional per-call thumbnail parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThumbnailOptions {
    /// Target timestamp (`HH:MM:SS[.ms]`, `MM:SS` or `SS`)
    pub timestamp: Option<String>,
    pub threads: Option<u32>,
    /// Seconds reserved for the precise stage of a two-stage seek
    pub preseek_offset: Option<f64>,
    pub timeout: Option<Duration>,
    /// Overrides [`MediaConfig::optimizations`] for this call
    pub optimizations: Option<bool>,
}

impl ThumbnailOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn preseek_offset(mut self, offset: f64) -> Self {
        self.preseek_offset = Some(offset);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn optimizations(mut self, enabled: bool) -> Self {
        self.optimizations = Some(enabled);
        self
    }
}

/// A fully resolved thumbnail capture.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailRequest {
    pub video_path: PathBuf,
    pub image_path: PathBuf,
    pub timestamp: String,
    pub threads: u32,
    pub preseek_offset: f64,
    pub timeout: Option<Duration>,
    pub optimizations: bool,
}

impl ThumbnailRequest {
    pub fn new(
        video_path: impl AsRef<Path>,
        image_path: impl AsRef<Path>,
        options: &ThumbnailOptions,
        config: &MediaConfig,
    ) -> Self {
        let optimizations = options.optimizations.unwrap_or(config.optimizations);
        let timestamp = options
            .timestamp
            .as_deref()
            .filter(|ts| !ts.is_empty())
            .unwrap_or(DEFAULT_THUMBNAIL_TIMESTAMP)
            .to_string();

        Self {
            video_path: video_path.as_ref().to_path_buf(),
            image_path: image_path.as_ref().to_path_buf(),
            timestamp,
            threads: resolve_threads(options.threads, config),
            preseek_offset: options.preseek_offset.unwrap_or(config.preseek_offset),
            timeout: resolve_timeout(optimizations, options.timeout, config),
            optimizations,
        }
    }

    /// Reject requests that cannot name a source and a destination.
    pub fn validate(&self) -> MediaResult<()> {
        require_path(&self.video_path, "video")?;
        require_path(&self.image_path, "image")
    }
}

/// Optional per-call parameters for track extraction (audio or subtitle).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackOptions {
    /// Ordinal of the track among streams of its kind
    pub stream_index: Option<u32>,
    pub threads: Option<u32>,
    pub timeout: Option<Duration>,
    /// Overrides [`MediaConfig::optimizations`] for this call
    pub optimizations: Option<bool>,
}

impl TrackOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stream_index(mut self, index: u32) -> Self {
        self.stream_index = Some(index);
        self
    }

    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn optimizations(mut self, enabled: bool) -> Self {
        self.optimizations = Some(enabled);
        self
    }
}

/// A fully resolved audio or subtitle extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRequest {
    pub video_path: PathBuf,
    pub output_path: PathBuf,
    pub stream: Option<StreamSelector>,
    pub threads: u32,
    pub timeout: Option<Duration>,
    pub optimizations: bool,
}

impl TrackRequest {
    /// Resolve an audio extraction.
    pub fn audio(
        video_path: impl AsRef<Path>,
        audio_path: impl AsRef<Path>,
        options: &TrackOptions,
        config: &MediaConfig,
    ) -> Self {
        Self::resolve(
            video_path.as_ref(),
            audio_path.as_ref(),
            options.stream_index.map(StreamSelector::audio),
            options,
            config,
        )
    }

    /// Resolve a subtitle extraction.
    pub fn subtitle(
        video_path: impl AsRef<Path>,
        subtitle_path: impl AsRef<Path>,
        options: &TrackOptions,
        config: &MediaConfig,
    ) -> Self {
        Self::resolve(
            video_path.as_ref(),
            subtitle_path.as_ref(),
            options.stream_index.map(StreamSelector::subtitle),
            options,
            config,
        )
    }

    fn resolve(
        video_path: &Path,
        output_path: &Path,
        stream: Option<StreamSelector>,
        options: &TrackOptions,
        config: &MediaConfig,
    ) -> Self {
        let optimizations = options.optimizations.unwrap_or(config.optimizations);

        Self {
            video_path: video_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            stream,
            threads: resolve_threads(options.threads, config),
            timeout: resolve_timeout(optimizations, options.timeout, config),
            optimizations,
        }
    }

    /// Reject requests that cannot name a source and a destination.
    pub fn validate(&self) -> MediaResult<()> {
        require_path(&self.video_path, "video")?;
        require_path(&self.output_path, "output")
    }
}
