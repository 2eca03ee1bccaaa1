//! Tracing setup.
//!
//! Logs go to stderr so `ffthumb probe` can keep stdout for JSON.

use std::path::Path;
use tracing::Span;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "warn,ffthumb_media=info,ffthumb_cli=info";

/// Whether `LOG_FORMAT` asks for JSON lines.
fn wants_json(log_format: Option<&str>) -> bool {
    log_format
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Initialize tracing with colored output for terminals, JSON when
/// `LOG_FORMAT=json`.
pub fn init_tracing() {
    let use_json = wants_json(std::env::var("LOG_FORMAT").ok().as_deref());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// Span wrapping one CLI operation on one source file.
pub fn operation_span(operation: &str, source: &Path) -> Span {
    tracing::info_span!(
        "operation",
        operation = %operation,
        source = %source.display()
    )
}
