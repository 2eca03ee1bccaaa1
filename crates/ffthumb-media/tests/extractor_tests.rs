//! Facade behaviour against a scripted executor.

mod common;

use std::time::Duration;

use common::ScriptedExecutor;
use ffthumb_media::{
    FrameExtractor, MediaConfig, MediaError, SeekPlan, SeekPosition, ThumbnailOptions,
    TrackOptions,
};

fn extractor(executor: ScriptedExecutor) -> FrameExtractor<ScriptedExecutor> {
    FrameExtractor::with_executor(MediaConfig::default(), executor)
}

fn movie_options() -> ThumbnailOptions {
    ThumbnailOptions::new().timestamp("00:10:05").preseek_offset(2.0)
}

#[tokio::test]
async fn test_two_stage_thumbnail_success() {
    let extractor = extractor(ScriptedExecutor::new().then_ok());

    let plan = extractor
        .try_capture_thumbnail("movie.mkv", "/tmp/thumb.jpg", &movie_options().threads(2))
        .await
        .unwrap();

    assert!(matches!(plan, SeekPlan::TwoStage { coarse, fine, .. } if coarse == 603.0 && fine == 2.0));

    let calls = extractor.executor().calls();
    assert_eq!(calls.len(), 1);
    let cmd = &calls[0].plan;
    assert_eq!(cmd.program(), "ffmpeg");
    assert_eq!(cmd.values_of("-ss"), vec!["603.000", "2.000"]);
    assert_eq!(cmd.values_of("-vframes"), vec!["1"]);
    assert_eq!(cmd.values_of("-threads"), vec!["2"]);
    assert_eq!(cmd.args().last().map(String::as_str), Some("/tmp/thumb.jpg"));

    // Coarse seek sits before the input, fine seek after it.
    let input = cmd.position("-i").unwrap();
    let first_seek = cmd.position("-ss").unwrap();
    assert!(first_seek < input);
    assert_eq!(calls[0].timeout, Some(Duration::from_secs(30)));
}

#[tokio::test]
async fn test_failed_two_stage_falls_back_once() {
    let extractor = extractor(ScriptedExecutor::new().then_exit(1).then_ok());

    let plan = extractor
        .try_capture_thumbnail("movie.mkv", "thumb.jpg", &movie_options())
        .await
        .unwrap();

    assert_eq!(
        plan,
        SeekPlan::Precise {
            position: SeekPosition::Seconds(605.0)
        }
    );

    let calls = extractor.executor().calls();
    assert_eq!(calls.len(), 2);
    let fallback = &calls[1].plan;
    assert_eq!(fallback.values_of("-ss"), vec!["605.000"]);
    assert!(fallback.position("-ss").unwrap() > fallback.position("-i").unwrap());
}

#[tokio::test]
async fn test_fallback_outcome_is_final() {
    let extractor = extractor(ScriptedExecutor::new().then_exit(1).then_exit(7));

    let err = extractor
        .try_capture_thumbnail("movie.mkv", "thumb.jpg", &movie_options())
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::ProcessFailed { exit_code: Some(7), .. }));
    assert_eq!(extractor.executor().calls().len(), 2);
}

#[tokio::test]
async fn test_timeout_triggers_fallback() {
    let executor = ScriptedExecutor::new().then_timeout(Duration::from_secs(30));
    let extractor = extractor(executor);

    assert!(
        extractor
            .capture_thumbnail("movie.mkv", "thumb.jpg", &movie_options())
            .await
    );
    assert_eq!(extractor.executor().calls().len(), 2);
}

#[tokio::test]
async fn test_launch_error_triggers_fallback() {
    let launch_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "spawn refused");
    let executor = ScriptedExecutor::new().then(Err(MediaError::Io(launch_error)));
    let extractor = extractor(executor);

    let plan = extractor
        .try_capture_thumbnail("movie.mkv", "thumb.jpg", &movie_options())
        .await
        .unwrap();

    assert!(matches!(plan, SeekPlan::Precise { .. }));
    let calls = extractor.executor().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].plan.values_of("-ss"), vec!["605.000"]);
}

#[tokio::test]
async fn test_zero_threads_keeps_cap_on_both_attempts() {
    let extractor = extractor(ScriptedExecutor::new().then_exit(1).then_ok());

    assert!(
        extractor
            .capture_thumbnail("movie.mkv", "thumb.jpg", &movie_options().threads(0))
            .await
    );

    let calls = extractor.executor().calls();
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert_eq!(call.plan.values_of("-threads"), vec!["1"]);
    }
}

#[tokio::test]
async fn test_bool_projection_reports_final_failure() {
    let extractor = extractor(ScriptedExecutor::new().then_exit(1).then_exit(1));

    assert!(
        !extractor
            .capture_thumbnail("movie.mkv", "thumb.jpg", &movie_options())
            .await
    );
    assert_eq!(extractor.executor().calls().len(), 2);
}

#[tokio::test]
async fn test_precise_failure_is_not_retried() {
    let extractor = extractor(ScriptedExecutor::new().then_exit(1));

    let options = ThumbnailOptions::new().timestamp("00:00:01");
    assert!(!extractor.capture_thumbnail("movie.mkv", "thumb.jpg", &options).await);
    assert_eq!(extractor.executor().calls().len(), 1);
}

#[tokio::test]
async fn test_zero_offset_never_plans_two_stage() {
    let extractor = extractor(ScriptedExecutor::new());

    let options = movie_options().preseek_offset(0.0);
    let plan = extractor
        .try_capture_thumbnail("movie.mkv", "thumb.jpg", &options)
        .await
        .unwrap();

    assert!(matches!(plan, SeekPlan::Precise { .. }));
    assert_eq!(extractor.executor().calls()[0].plan.values_of("-ss"), vec!["605.000"]);
}

#[tokio::test]
async fn test_disabled_optimizations_use_legacy_command() {
    let config = MediaConfig::default().with_optimizations(false);
    let extractor = FrameExtractor::with_executor(config, ScriptedExecutor::new().then_exit(1));

    assert!(!extractor.capture_thumbnail("movie.mkv", "thumb.jpg", &movie_options()).await);

    let calls = extractor.executor().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].plan.args(),
        &["-y", "-i", "movie.mkv", "-ss", "00:10:05", "-vframes", "1", "-f", "image2", "thumb.jpg"]
    );
    assert_eq!(calls[0].timeout, None);
}

#[tokio::test]
async fn test_per_call_override_enables_optimizations() {
    let config = MediaConfig::default().with_optimizations(false);
    let extractor = FrameExtractor::with_executor(config, ScriptedExecutor::new());

    let plan = extractor
        .try_capture_thumbnail("movie.mkv", "thumb.jpg", &movie_options().optimizations(true))
        .await
        .unwrap();
    assert!(matches!(plan, SeekPlan::TwoStage { .. }));
}

#[tokio::test]
async fn test_empty_paths_spawn_nothing() {
    let extractor = extractor(ScriptedExecutor::new());

    assert!(!extractor.capture_thumbnail("", "thumb.jpg", &movie_options()).await);
    assert!(!extractor.capture_thumbnail("movie.mkv", "", &movie_options()).await);
    assert!(!extractor.extract_audio("", "a.wav", &TrackOptions::new()).await);
    assert!(!extractor.extract_subtitle("movie.mkv", "", &TrackOptions::new()).await);
    assert!(extractor.get_metadata("", None).await.is_none());

    assert!(extractor.executor().calls().is_empty());
}

#[tokio::test]
async fn test_missing_ffmpeg_spawns_nothing() {
    let extractor = extractor(ScriptedExecutor::new().without_tool("ffmpeg"));

    let err = extractor
        .try_capture_thumbnail("movie.mkv", "thumb.jpg", &movie_options())
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::ToolNotFound(ref p) if p == "ffmpeg"));
    assert!(!extractor.extract_audio("movie.mkv", "a.wav", &TrackOptions::new()).await);
    assert!(!extractor.extract_subtitle("movie.mkv", "a.srt", &TrackOptions::new()).await);

    assert!(extractor.executor().calls().is_empty());
}

#[tokio::test]
async fn test_audio_extraction() {
    let extractor = extractor(ScriptedExecutor::new().then_ok().then_exit(1));

    let options = TrackOptions::new().stream_index(1);
    assert!(extractor.extract_audio("movie.mkv", "movie.wav", &options).await);
    assert!(!extractor.extract_audio("movie.mkv", "movie.wav", &options).await);

    let calls = extractor.executor().calls();
    assert_eq!(calls.len(), 2, "audio extraction never retries");
    assert!(calls[0].plan.contains("-vn"));
    assert_eq!(calls[0].plan.values_of("-map"), vec!["0:a:1"]);
    assert_eq!(calls[0].plan.values_of("-ar"), vec!["16000"]);
    assert_eq!(calls[0].timeout, Some(Duration::from_secs(30)));
}

#[tokio::test]
async fn test_legacy_track_extraction_is_unbounded() {
    let config = MediaConfig::default().with_optimizations(false);
    let extractor = FrameExtractor::with_executor(config, ScriptedExecutor::new());

    assert!(extractor.extract_audio("movie.mkv", "movie.wav", &TrackOptions::new()).await);
    assert!(extractor.extract_subtitle("movie.mkv", "movie.srt", &TrackOptions::new()).await);

    let calls = extractor.executor().calls();
    assert!(calls.iter().all(|c| c.timeout.is_none()));
    assert!(!calls[0].plan.contains("-vn"));
    assert!(!calls[1].plan.contains("-c:s"));
    assert!(calls.iter().all(|c| !c.plan.contains("-threads")));
}

#[tokio::test]
async fn test_subtitle_extraction_copies_stream() {
    let extractor = extractor(ScriptedExecutor::new());

    let options = TrackOptions::new().stream_index(0).threads(4);
    assert!(extractor.extract_subtitle("movie.mkv", "movie.srt", &options).await);

    let cmd = &extractor.executor().calls()[0].plan;
    assert_eq!(cmd.values_of("-map"), vec!["0:s:0"]);
    assert_eq!(cmd.values_of("-c:s"), vec!["copy"]);
    assert_eq!(cmd.values_of("-threads"), vec!["4"]);
}

#[tokio::test]
async fn test_metadata_success() {
    let executor = ScriptedExecutor::new()
        .then_stdout(r#"{"format":{"format_name":"matroska,webm"},"streams":[{"index":0}]}"#);
    let extractor = extractor(executor);

    let metadata = extractor.get_metadata("movie.mkv", None).await.unwrap();
    assert_eq!(metadata["format"]["format_name"], "matroska,webm");

    let calls = extractor.executor().calls();
    assert_eq!(calls[0].plan.program(), "ffprobe");
    assert_eq!(calls[0].timeout, Some(Duration::from_secs(30)));
}

#[tokio::test]
async fn test_metadata_unavailable() {
    let executor = ScriptedExecutor::new()
        .then_exit(1)
        .then_timeout(Duration::from_secs(5))
        .then_stdout("{not json")
        .then_stdout("\"just a string\"");
    let extractor = extractor(executor);

    for _ in 0..4 {
        assert!(extractor
            .get_metadata("movie.mkv", Some(Duration::from_secs(5)))
            .await
            .is_none());
    }
    assert_eq!(extractor.executor().calls().len(), 4);
}

#[tokio::test]
async fn test_metadata_without_ffprobe() {
    let extractor = extractor(ScriptedExecutor::new().without_tool("ffprobe"));

    let err = extractor.try_get_metadata("movie.mkv", None).await.unwrap_err();
    assert!(matches!(err, MediaError::ToolNotFound(ref p) if p == "ffprobe"));
    assert!(extractor.executor().calls().is_empty());
}
