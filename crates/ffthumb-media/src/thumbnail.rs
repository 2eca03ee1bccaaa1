//! Thumbnail capture.
//!
//! Containers can only be seeked cheaply to keyframes; landing on an exact
//! timestamp means decoding forward from the keyframe before it. The optimized
//! path therefore seeks in two stages: a fast input seek to
//! `target - preseek_offset`, then an output seek over the remaining
//! `preseek_offset` seconds. Decode work is bounded by the offset instead of
//! by the absolute target, and the frame is still exact. If that command
//! fails for any reason, a single precise seek from the start of the input is
//! tried before giving up.

use tracing::{info, warn};

use ffthumb_models::defaults::THUMBNAIL_QUALITY;
use ffthumb_models::{format_seconds, parse_timestamp};

use crate::command::{format_seek, CommandExecutor, CommandPlan, FfmpegCommand, FFMPEG};
use crate::error::MediaResult;
use crate::request::ThumbnailRequest;

/// Where a precise (after-input) seek lands.
#[derive(Debug, Clone, PartialEq)]
pub enum SeekPosition {
    /// A parsed timestamp in seconds
    Seconds(f64),
    /// A timestamp we could not parse, handed to ffmpeg verbatim
    Raw(String),
}

impl SeekPosition {
    /// The `-ss` argument for this position.
    pub fn to_arg(&self) -> String {
        match self {
            SeekPosition::Seconds(secs) => format_seek(*secs),
            SeekPosition::Raw(ts) => ts.clone(),
        }
    }
}

/// How a thumbnail request will seek to its frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SeekPlan {
    /// Optimizations off: the historical `-y -i SRC -ss TS -f image2` command.
    Legacy { timestamp: String },
    /// One accurate seek after the input; decodes from the start of the file.
    Precise { position: SeekPosition },
    /// Keyframe seek to `coarse` before the input, then an accurate seek of
    /// `fine` seconds after it. `coarse + fine == target`.
    TwoStage { coarse: f64, fine: f64, target: f64 },
}

impl SeekPlan {
    /// The plan to retry with if this one fails.
    pub fn fallback(&self) -> Option<SeekPlan> {
        match self {
            SeekPlan::TwoStage { target, .. } => Some(SeekPlan::Precise {
                position: SeekPosition::Seconds(*target),
            }),
            _ => None,
        }
    }

    /// The parsed target in seconds, when the plan has one.
    pub fn target_seconds(&self) -> Option<f64> {
        match self {
            SeekPlan::Precise {
                position: SeekPosition::Seconds(secs),
            } => Some(*secs),
            SeekPlan::TwoStage { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn strategy(&self) -> &'static str {
        match self {
            SeekPlan::Legacy { .. } => "legacy",
            SeekPlan::Precise { .. } => "precise",
            SeekPlan::TwoStage { .. } => "two_stage",
        }
    }
}

/// Decide how to seek to `timestamp`.
pub fn plan_seek(timestamp: &str, preseek_offset: f64, optimizations: bool) -> SeekPlan {
    if !optimizations {
        return SeekPlan::Legacy {
            timestamp: timestamp.to_string(),
        };
    }

    let target = match parse_timestamp(timestamp) {
        Ok(secs) => secs,
        Err(_) => {
            return SeekPlan::Precise {
                position: SeekPosition::Raw(timestamp.to_string()),
            }
        }
    };

    let coarse = (target - preseek_offset).max(0.0);
    let fine = target - coarse;

    if coarse <= 0.0 || preseek_offset <= 0.0 {
        return SeekPlan::Precise {
            position: SeekPosition::Seconds(target),
        };
    }

    SeekPlan::TwoStage {
        coarse,
        fine,
        target,
    }
}

/// Build the ffmpeg invocation for `plan`.
pub fn build_command(req: &ThumbnailRequest, plan: &SeekPlan) -> CommandPlan {
    let cmd = FfmpegCommand::new(&req.video_path, &req.image_path);

    let cmd = match plan {
        SeekPlan::Legacy { timestamp } => {
            return cmd
                .overwrite()
                .seek_output(timestamp.as_str())
                .single_frame()
                .format("image2")
                .build();
        }
        SeekPlan::Precise { position } => cmd.batch_mode().seek_output(position.to_arg()),
        SeekPlan::TwoStage { coarse, fine, .. } => cmd
            .batch_mode()
            .seek(*coarse)
            .seek_output(format_seek(*fine)),
    };

    cmd.single_frame()
        .quality(THUMBNAIL_QUALITY)
        .threads(req.threads)
        .build()
}

/// Capture one frame of `req.video_path` into `req.image_path`.
///
/// Returns the plan that produced the image: the planned one, or its precise
/// fallback when a two-stage attempt failed and the retry succeeded.
pub async fn capture_thumbnail<E>(executor: &E, req: &ThumbnailRequest) -> MediaResult<SeekPlan>
where
    E: CommandExecutor + ?Sized,
{
    req.validate()?;
    executor.locate(FFMPEG)?;

    let plan = plan_seek(&req.timestamp, req.preseek_offset, req.optimizations);
    let seek_target = plan
        .target_seconds()
        .map_or_else(|| req.timestamp.clone(), format_seconds);
    info!(
        strategy = plan.strategy(),
        seek_target = %seek_target,
        "Capturing thumbnail: {} -> {}",
        req.video_path.display(),
        req.image_path.display()
    );

    let err = match executor.execute(&build_command(req, &plan), req.timeout).await {
        Ok(_) => return Ok(plan),
        Err(e) => e,
    };

    let Some(fallback) = plan.fallback() else {
        return Err(err);
    };

    warn!(
        error = %err,
        "Two-stage seek failed for {}, retrying with precise seek",
        req.video_path.display()
    );
    metrics::counter!("ffthumb_thumbnail_fallback_total").increment(1);

    executor
        .execute(&build_command(req, &fallback), req.timeout)
        .await?;
    Ok(fallback)
}
