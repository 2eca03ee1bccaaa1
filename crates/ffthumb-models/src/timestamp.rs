//! Timestamp parsing utilities.
//!
//! Thumbnail timestamps arrive as free-form strings such as `HH:MM:SS`,
//! `HH:MM:SS.mmm`, `MM:SS` or `SS`. Parsing failure is not fatal for callers:
//! it simply selects the raw-string seek path.

use thiserror::Error;

/// Parse a timestamp string to total seconds.
///
/// The string is split on `:` and folded left to right as
/// `total = total * 60 + segment`, so any number of segments is accepted and
/// the usual `HH:MM:SS` interpretation falls out of the fold. Every segment
/// must be a finite, non-negative number.
///
/// # Examples
/// ```
/// use ffthumb_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("01:02:03").unwrap(), 3723.0);
/// assert_eq!(parse_timestamp("02:03").unwrap(), 123.0);
/// assert_eq!(parse_timestamp("45").unwrap(), 45.0);
/// assert!(parse_timestamp("abc").is_err());
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    if ts.trim().is_empty() {
        return Err(TimestampError::Empty);
    }

    ts.split(':').try_fold(0.0_f64, |total, segment| {
        let segment = segment.trim();
        let value: f64 = segment
            .parse()
            .map_err(|_| TimestampError::InvalidValue(segment.to_string()))?;
        if !value.is_finite() {
            return Err(TimestampError::InvalidValue(segment.to_string()));
        }
        if value < 0.0 {
            return Err(TimestampError::Negative);
        }
        Ok(total * 60.0 + value)
    })
}

/// Format seconds into HH:MM:SS or HH:MM:SS.mmm string.
///
/// Rounds to the nearest millisecond first, so carries propagate into the
/// minute and hour fields.
pub fn format_seconds(total_secs: f64) -> String {
    let total_ms = (total_secs.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let mins = (total_ms / 60_000) % 60;
    let secs = (total_ms / 1000) % 60;
    let ms = total_ms % 1000;

    if ms > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    }
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("Timestamp cannot be empty")]
    Empty,

    #[error("Timestamp cannot be negative")]
    Negative,

    #[error("Invalid timestamp segment: {0:?}")]
    InvalidValue(String),
}
