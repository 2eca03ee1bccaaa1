//! Audio track extraction to 16 kHz mono WAV.

use tracing::info;

use ffthumb_models::defaults::{AUDIO_CHANNELS, AUDIO_CODEC, AUDIO_SAMPLE_RATE};

use crate::command::{CommandExecutor, CommandPlan, FfmpegCommand, FFMPEG};
use crate::error::MediaResult;
use crate::request::TrackRequest;

/// Build the ffmpeg invocation for an audio extraction.
pub fn build_command(req: &TrackRequest) -> CommandPlan {
    let mut cmd = FfmpegCommand::new(&req.video_path, &req.output_path);

    cmd = if req.optimizations {
        cmd.batch_mode().no_video()
    } else {
        cmd.hide_banner().log_level("warning").overwrite()
    };

    if let Some(stream) = req.stream {
        cmd = cmd.map(stream.map_spec());
    }

    cmd = cmd
        .audio_codec(AUDIO_CODEC)
        .audio_channels(AUDIO_CHANNELS)
        .audio_sample_rate(AUDIO_SAMPLE_RATE);

    if req.optimizations {
        cmd = cmd.threads(req.threads);
    }

    cmd.build()
}

/// Extract one audio track of `req.video_path` as PCM WAV. Single attempt.
pub async fn extract_audio<E>(executor: &E, req: &TrackRequest) -> MediaResult<()>
where
    E: CommandExecutor + ?Sized,
{
    req.validate()?;
    executor.locate(FFMPEG)?;

    info!(
        stream = ?req.stream,
        optimized = req.optimizations,
        "Extracting audio: {} -> {}",
        req.video_path.display(),
        req.output_path.display()
    );

    executor.execute(&build_command(req), req.timeout).await?;
    Ok(())
}
