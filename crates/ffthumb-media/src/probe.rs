//! FFprobe container/stream metadata.
//!
//! The JSON is passed through untouched as a generic map; interpreting
//! individual fields is left to the caller.

use serde_json::{Map, Value};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::command::{CommandExecutor, CommandPlan, FFPROBE};
use crate::error::{MediaError, MediaResult};
use crate::request::require_path;

/// Generic ffprobe output: `{"format": {...}, "streams": [...]}`.
pub type Metadata = Map<String, Value>;

/// Build the ffprobe invocation for `path`.
pub fn build_command(path: &Path) -> CommandPlan {
    CommandPlan::new(
        FFPROBE,
        [
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ]
        .into_iter()
        .map(String::from)
        .chain(std::iter::once(path.to_string_lossy().to_string())),
    )
}

/// Parse ffprobe stdout into a metadata map.
pub fn parse_metadata(stdout: &[u8]) -> MediaResult<Metadata> {
    match serde_json::from_slice::<Value>(stdout)? {
        Value::Object(map) => Ok(map),
        other => Err(MediaError::UnexpectedMetadata(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Probe a media file for container and stream information.
pub async fn get_metadata<E>(
    executor: &E,
    path: impl AsRef<Path>,
    timeout: Duration,
) -> MediaResult<Metadata>
where
    E: CommandExecutor + ?Sized,
{
    let path = path.as_ref();
    require_path(path, "video")?;
    executor.locate(FFPROBE)?;

    let output = executor.execute(&build_command(path), Some(timeout)).await?;
    let metadata = parse_metadata(&output.stdout)?;

    let streams = stream_count(&metadata);
    debug!(streams, "Probed {}", path.display());
    Ok(metadata)
}

/// Number of entries in the `streams` array, 0 when absent.
fn stream_count(metadata: &Metadata) -> usize {
    metadata
        .get("streams")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}
