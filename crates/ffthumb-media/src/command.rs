//! FFmpeg command builder and runner.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Name of the ffmpeg executable looked up on `PATH`.
pub const FFMPEG: &str = "ffmpeg";
/// Name of the ffprobe executable looked up on `PATH`.
pub const FFPROBE: &str = "ffprobe";

/// Format a seek position in seconds the way it is passed to `-ss`.
pub fn format_seek(seconds: f64) -> String {
    format!("{:.3}", seconds)
}

/// One fully resolved external-tool invocation.
///
/// Plans are plain token lists: no shell is involved, so paths with spaces or
/// quotes reach the tool untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    program: String,
    args: Vec<String>,
}

impl CommandPlan {
    /// Create a plan from a program name and its arguments.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Position of the first argument equal to `token`.
    pub fn position(&self, token: &str) -> Option<usize> {
        self.args.iter().position(|a| a == token)
    }

    /// Whether `token` appears among the arguments.
    pub fn contains(&self, token: &str) -> bool {
        self.position(token).is_some()
    }

    /// Every value that directly follows an occurrence of `flag`, in order.
    pub fn values_of(&self, flag: &str) -> Vec<&str> {
        self.args
            .windows(2)
            .filter(|pair| pair[0] == flag)
            .map(|pair| pair[1].as_str())
            .collect()
    }
}

impl fmt::Display for CommandPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Builder for FFmpeg commands.
///
/// Arguments are emitted as `ffmpeg <global> <input args> -i INPUT <output args> OUTPUT`,
/// so a seek added with [`FfmpegCommand::seek`] lands before the input (fast,
/// keyframe granular) and one added with [`FfmpegCommand::seek_output`] lands
/// after it (frame accurate).
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Global arguments (before any input option)
    global_args: Vec<String>,
    /// Input arguments (before -i)
    input_args: Vec<String>,
    /// Output arguments (after -i)
    output_args: Vec<String>,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            global_args: Vec::new(),
            input_args: Vec::new(),
            output_args: Vec::new(),
        }
    }

    /// Add a global argument.
    pub fn global_arg(mut self, arg: impl Into<String>) -> Self {
        self.global_args.push(arg.into());
        self
    }

    /// Add input arguments (before -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Suppress the version banner.
    pub fn hide_banner(self) -> Self {
        self.global_arg("-hide_banner")
    }

    /// Set log level.
    pub fn log_level(self, level: impl Into<String>) -> Self {
        self.global_arg("-loglevel").global_arg(level)
    }

    /// Never read from stdin.
    pub fn no_stdin(self) -> Self {
        self.global_arg("-nostdin")
    }

    /// Overwrite the output file without asking.
    pub fn overwrite(self) -> Self {
        self.global_arg("-y")
    }

    /// The global flags shared by every optimized invocation.
    pub fn batch_mode(self) -> Self {
        self.hide_banner().log_level("error").no_stdin().overwrite()
    }

    /// Set seek position (before input).
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format_seek(seconds))
    }

    /// Set seek position (after input). Accepts any ffmpeg time syntax.
    pub fn seek_output(self, position: impl Into<String>) -> Self {
        self.output_arg("-ss").output_arg(position)
    }

    /// Extract single frame.
    pub fn single_frame(self) -> Self {
        self.output_arg("-vframes").output_arg("1")
    }

    /// Set image quality (`-q:v`, lower is better).
    pub fn quality(self, q: u8) -> Self {
        self.output_arg("-q:v").output_arg(q.to_string())
    }

    /// Cap decode/encode threads.
    pub fn threads(self, threads: u32) -> Self {
        self.output_arg("-threads").output_arg(threads.to_string())
    }

    /// Force output format.
    pub fn format(self, format: impl Into<String>) -> Self {
        self.output_arg("-f").output_arg(format)
    }

    /// Select a stream by map specifier.
    pub fn map(self, spec: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(spec)
    }

    /// Drop video streams.
    pub fn no_video(self) -> Self {
        self.output_arg("-vn")
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-acodec").output_arg(codec)
    }

    /// Set audio channel count.
    pub fn audio_channels(self, channels: u32) -> Self {
        self.output_arg("-ac").output_arg(channels.to_string())
    }

    /// Set audio sample rate.
    pub fn audio_sample_rate(self, rate: u32) -> Self {
        self.output_arg("-ar").output_arg(rate.to_string())
    }

    /// Set subtitle codec.
    pub fn subtitle_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:s").output_arg(codec)
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(
            self.global_args.len() + self.input_args.len() + self.output_args.len() + 3,
        );

        args.extend(self.global_args.iter().cloned());
        args.extend(self.input_args.iter().cloned());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().to_string());

        args
    }

    /// Build the final ffmpeg invocation.
    pub fn build(&self) -> CommandPlan {
        CommandPlan::new(FFMPEG, self.build_args())
    }
}

/// Captured output of a successful process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Something that can locate and run external tools.
///
/// The real implementation is [`FfmpegRunner`]; tests substitute a scripted
/// executor to observe which plans are run.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Resolve `program` on the search path.
    fn locate(&self, program: &str) -> MediaResult<PathBuf>;

    /// Run `plan` to completion, killing it once `timeout` elapses.
    ///
    /// Only a zero exit status is `Ok`; every other outcome is an error value.
    async fn execute(
        &self,
        plan: &CommandPlan,
        timeout: Option<Duration>,
    ) -> MediaResult<ProcessOutput>;
}

/// Runner for ffmpeg/ffprobe child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegRunner;

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for FfmpegRunner {
    fn locate(&self, program: &str) -> MediaResult<PathBuf> {
        which::which(program).map_err(|_| MediaError::tool_not_found(program))
    }

    async fn execute(
        &self,
        plan: &CommandPlan,
        timeout: Option<Duration>,
    ) -> MediaResult<ProcessOutput> {
        debug!("Running: {}", plan);
        let started = Instant::now();

        let child = Command::new(plan.program())
            .args(plan.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!(program = plan.program(), error = %e, "Failed to launch process");
                let err = if e.kind() == std::io::ErrorKind::NotFound {
                    MediaError::tool_not_found(plan.program())
                } else {
                    MediaError::Io(e)
                };
                record_outcome(plan.program(), err.kind());
                return Err(err);
            }
        };

        // Dropping the wait future drops the child, which kills it.
        let wait = child.wait_with_output();
        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(
                        "{} timed out after {:?}, killing process: {}",
                        plan.program(),
                        limit,
                        plan
                    );
                    record_outcome(plan.program(), "timeout");
                    return Err(MediaError::Timeout(limit));
                }
            },
            None => wait.await,
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                warn!(program = plan.program(), error = %e, "Failed to wait for process");
                record_outcome(plan.program(), "launch_error");
                return Err(MediaError::Io(e));
            }
        };

        if output.status.success() {
            debug!(
                program = plan.program(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Process finished"
            );
            record_outcome(plan.program(), "success");
            return Ok(ProcessOutput {
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(
            exit_code = ?output.status.code(),
            stderr = %stderr,
            "{} failed: {}",
            plan.program(),
            plan
        );
        record_outcome(plan.program(), "process_failed");
        Err(MediaError::process_failed(
            plan.program(),
            output.status.code(),
            stderr,
        ))
    }
}

fn record_outcome(program: &str, outcome: &'static str) {
    metrics::counter!(
        "ffthumb_process_total",
        "program" => program.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    FfmpegRunner.locate(FFMPEG)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    FfmpegRunner.locate(FFPROBE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder_order() {
        let plan = FfmpegCommand::new("in put.mkv", "out.jpg")
            .batch_mode()
            .seek(603.0)
            .seek_output("2")
            .single_frame()
            .build();

        assert_eq!(plan.program(), "ffmpeg");
        assert_eq!(
            plan.args(),
            &[
                "-hide_banner", "-loglevel", "error", "-nostdin", "-y", "-ss", "603.000", "-i",
                "in put.mkv", "-ss", "2", "-vframes", "1", "out.jpg",
            ]
        );
    }

    #[test]
    fn test_plan_lookup_helpers() {
        let plan = CommandPlan::new("ffmpeg", ["-ss", "1", "-i", "a", "-ss", "2", "b"]);
        assert_eq!(plan.values_of("-ss"), vec!["1", "2"]);
        assert_eq!(plan.position("-i"), Some(2));
        assert!(!plan.contains("-vn"));
        assert_eq!(plan.to_string(), "ffmpeg -ss 1 -i a -ss 2 b");
    }

    #[test]
    fn test_format_seek() {
        assert_eq!(format_seek(603.0), "603.000");
        assert_eq!(format_seek(2.5), "2.500");
        assert_eq!(format_seek(0.0), "0.000");
    }

    #[test]
    fn test_locate_missing_tool() {
        let err = FfmpegRunner.locate("ffthumb-no-such-tool").unwrap_err();
        assert!(matches!(err, MediaError::ToolNotFound(ref p) if p == "ffthumb-no-such-tool"));
    }

    #[tokio::test]
    async fn test_execute_missing_program() {
        let plan = CommandPlan::new("ffthumb-no-such-tool", ["-version"]);
        let err = FfmpegRunner.execute(&plan, None).await.unwrap_err();
        assert!(matches!(err, MediaError::ToolNotFound(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_success_captures_stdout() {
        let plan = CommandPlan::new("sh", ["-c", "printf hello"]);
        let output = FfmpegRunner
            .execute(&plan, Some(Duration::from_secs(5)))
            .await
            .unwrap();
        assert_eq!(output.stdout, b"hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_non_zero_exit() {
        let plan = CommandPlan::new("sh", ["-c", "echo broken >&2; exit 3"]);
        let err = FfmpegRunner
            .execute(&plan, Some(Duration::from_secs(5)))
            .await
            .unwrap_err();
        match err {
            MediaError::ProcessFailed {
                program,
                exit_code,
                stderr,
            } => {
                assert_eq!(program, "sh");
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_timeout_kills_process() {
        let plan = CommandPlan::new("sleep", ["10"]);
        let started = Instant::now();
        let err = FfmpegRunner
            .execute(&plan, Some(Duration::from_millis(100)))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::Timeout(d) if d == Duration::from_millis(100)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
