//! Extractor facade.
//!
//! `FrameExtractor` bundles a [`MediaConfig`] with an executor and exposes the
//! four operations in two flavours: `try_*` methods returning the typed
//! [`MediaResult`], and plain methods that log the failure and collapse it to
//! `bool` / `Option` for callers that only care whether it worked.

use std::fmt::Display;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

use crate::audio;
use crate::command::{CommandExecutor, FfmpegRunner};
use crate::config::MediaConfig;
use crate::error::MediaResult;
use crate::probe::{self, Metadata};
use crate::request::{ThumbnailOptions, ThumbnailRequest, TrackOptions, TrackRequest};
use crate::subtitle;
use crate::thumbnail::{self, SeekPlan};

/// Stateless front door to thumbnail/audio/subtitle extraction and probing.
///
/// Every call spawns its own child process(es), so a single extractor can be
/// shared across tasks.
#[derive(Debug, Clone)]
pub struct FrameExtractor<E = FfmpegRunner> {
    config: MediaConfig,
    executor: E,
}

impl FrameExtractor<FfmpegRunner> {
    /// Create an extractor that runs the real tools.
    pub fn new(config: MediaConfig) -> Self {
        Self::with_executor(config, FfmpegRunner::new())
    }

    /// Create an extractor configured from the environment.
    pub fn from_env() -> Self {
        Self::new(MediaConfig::from_env())
    }
}

impl<E: CommandExecutor> FrameExtractor<E> {
    /// Create an extractor around a custom executor.
    pub fn with_executor(config: MediaConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Capture a still frame, returning the seek plan that produced it.
    pub async fn try_capture_thumbnail(
        &self,
        video_path: impl AsRef<Path>,
        image_path: impl AsRef<Path>,
        options: &ThumbnailOptions,
    ) -> MediaResult<SeekPlan> {
        let req = ThumbnailRequest::new(video_path, image_path, options, &self.config);
        thumbnail::capture_thumbnail(&self.executor, &req).await
    }

    /// Capture a still frame.
    pub async fn capture_thumbnail(
        &self,
        video_path: impl AsRef<Path>,
        image_path: impl AsRef<Path>,
        options: &ThumbnailOptions,
    ) -> bool {
        let video_path = video_path.as_ref();
        let result = self
            .try_capture_thumbnail(video_path, image_path, options)
            .await;
        succeeded("Thumbnail capture", video_path.display(), result).is_some()
    }

    /// Extract an audio track as 16 kHz mono PCM WAV.
    pub async fn try_extract_audio(
        &self,
        video_path: impl AsRef<Path>,
        audio_path: impl AsRef<Path>,
        options: &TrackOptions,
    ) -> MediaResult<()> {
        let req = TrackRequest::audio(video_path, audio_path, options, &self.config);
        audio::extract_audio(&self.executor, &req).await
    }

    /// Extract an audio track as 16 kHz mono PCM WAV.
    pub async fn extract_audio(
        &self,
        video_path: impl AsRef<Path>,
        audio_path: impl AsRef<Path>,
        options: &TrackOptions,
    ) -> bool {
        let video_path = video_path.as_ref();
        let result = self.try_extract_audio(video_path, audio_path, options).await;
        succeeded("Audio extraction", video_path.display(), result).is_some()
    }

    /// Extract a subtitle track.
    pub async fn try_extract_subtitle(
        &self,
        video_path: impl AsRef<Path>,
        subtitle_path: impl AsRef<Path>,
        options: &TrackOptions,
    ) -> MediaResult<()> {
        let req = TrackRequest::subtitle(video_path, subtitle_path, options, &self.config);
        subtitle::extract_subtitle(&self.executor, &req).await
    }

    /// Extract a subtitle track.
    pub async fn extract_subtitle(
        &self,
        video_path: impl AsRef<Path>,
        subtitle_path: impl AsRef<Path>,
        options: &TrackOptions,
    ) -> bool {
        let video_path = video_path.as_ref();
        let result = self
            .try_extract_subtitle(video_path, subtitle_path, options)
            .await;
        succeeded("Subtitle extraction", video_path.display(), result).is_some()
    }

    /// Probe container and stream metadata. `timeout` defaults to the
    /// configured one.
    pub async fn try_get_metadata(
        &self,
        video_path: impl AsRef<Path>,
        timeout: Option<Duration>,
    ) -> MediaResult<Metadata> {
        let timeout = timeout.unwrap_or(self.config.timeout);
        probe::get_metadata(&self.executor, video_path, timeout).await
    }

    /// Probe container and stream metadata; `None` when unavailable.
    pub async fn get_metadata(
        &self,
        video_path: impl AsRef<Path>,
        timeout: Option<Duration>,
    ) -> Option<Metadata> {
        let video_path = video_path.as_ref();
        let result = self.try_get_metadata(video_path, timeout).await;
        succeeded("Metadata probe", video_path.display(), result)
    }
}

fn succeeded<T>(operation: &str, subject: impl Display, result: MediaResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                kind = e.kind(),
                stderr = e.stderr().unwrap_or(""),
                "{} failed for {}: {}",
                operation,
                subject,
                e
            );
            None
        }
    }
}
