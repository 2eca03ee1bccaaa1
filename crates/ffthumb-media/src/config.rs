//! Extraction configuration.

use std::time::Duration;

use ffthumb_models::defaults::{
    DEFAULT_PRESEEK_OFFSET, DEFAULT_THREADS, DEFAULT_TIMEOUT_SECS,
};

/// Environment variable toggling the optimized command shapes ("0" disables).
pub const OPTIMIZATIONS_ENV: &str = "FFMPEG_OPTIMIZATIONS";

/// Process-wide extraction defaults.
///
/// Built once at the edge of the program (usually with [`MediaConfig::from_env`])
/// and passed down; per-call options override individual fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaConfig {
    /// Use the optimized command shapes (two-stage seek, `-vn`, `-c:s copy`, timeouts)
    pub optimizations: bool,
    /// Decode threads passed to ffmpeg
    pub threads: u32,
    /// Seconds reserved for the precise stage of a two-stage seek
    pub preseek_offset: f64,
    /// Timeout for optimized ffmpeg invocations and ffprobe
    pub timeout: Duration,
    /// Timeout for legacy invocations. `None` leaves them unbounded, which is
    /// how the legacy command shapes have always run.
    pub legacy_timeout: Option<Duration>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            optimizations: true,
            threads: DEFAULT_THREADS,
            preseek_offset: DEFAULT_PRESEEK_OFFSET,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            legacy_timeout: None,
        }
    }
}

impl MediaConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            optimizations: lookup(OPTIMIZATIONS_ENV)
                .map(|v| v.trim() != "0")
                .unwrap_or(defaults.optimizations),
            threads: lookup("FFMPEG_THREADS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|t| *t > 0)
                .unwrap_or(defaults.threads),
            preseek_offset: lookup("FFMPEG_PRESEEK_OFFSET")
                .and_then(|s| s.trim().parse::<f64>().ok())
                .filter(|o| o.is_finite())
                .unwrap_or(defaults.preseek_offset),
            timeout: lookup("FFMPEG_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            legacy_timeout: lookup("FFMPEG_LEGACY_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs),
        }
    }

    /// Override the optimization switch.
    pub fn with_optimizations(mut self, enabled: bool) -> Self {
        self.optimizations = enabled;
        self
    }

    /// Bound legacy invocations as well.
    pub fn with_legacy_timeout(mut self, timeout: Duration) -> Self {
        self.legacy_timeout = Some(timeout);
        self
    }
}
