//! Subtitle track extraction.

use tracing::info;

use crate::command::{CommandExecutor, CommandPlan, FfmpegCommand, FFMPEG};
use crate::error::MediaResult;
use crate::request::TrackRequest;

/// Build the ffmpeg invocation for a subtitle extraction.
///
/// The optimized shape stream-copies the track; the legacy shape lets ffmpeg
/// pick a codec from the output extension.
pub fn build_command(req: &TrackRequest) -> CommandPlan {
    let mut cmd = FfmpegCommand::new(&req.video_path, &req.output_path);

    cmd = if req.optimizations {
        cmd.batch_mode()
    } else {
        cmd.hide_banner().log_level("warning").overwrite()
    };

    if let Some(stream) = req.stream {
        cmd = cmd.map(stream.map_spec());
    }

    if req.optimizations {
        cmd = cmd.subtitle_codec("copy").threads(req.threads);
    }

    cmd.build()
}

/// Extract one subtitle track of `req.video_path`. Single attempt.
pub async fn extract_subtitle<E>(executor: &E, req: &TrackRequest) -> MediaResult<()>
where
    E: CommandExecutor + ?Sized,
{
    req.validate()?;
    executor.locate(FFMPEG)?;

    info!(
        stream = ?req.stream,
        optimized = req.optimizations,
        "Extracting subtitle: {} -> {}",
        req.video_path.display(),
        req.output_path.display()
    );

    executor.execute(&build_command(req), req.timeout).await?;
    Ok(())
}
