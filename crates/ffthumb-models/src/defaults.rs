//! Default extraction settings.

/// Timestamp captured when the caller does not supply one.
pub const DEFAULT_THUMBNAIL_TIMESTAMP: &str = "00:03:01";
/// Decode threads handed to ffmpeg via `-threads`.
pub const DEFAULT_THREADS: u32 = 1;
/// Seconds reserved for the precise second stage of a two-stage seek.
pub const DEFAULT_PRESEEK_OFFSET: f64 = 2.0;
/// Per-invocation timeout for the optimized command shapes and ffprobe.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// JPEG quality passed to `-q:v` for optimized thumbnails (2 = near best).
pub const THUMBNAIL_QUALITY: u8 = 2;

/// Audio extraction target: 16 kHz mono signed 16-bit PCM.
pub const AUDIO_CODEC: &str = "pcm_s16le";
pub const AUDIO_CHANNELS: u32 = 1;
pub const AUDIO_SAMPLE_RATE: u32 = 16_000;

