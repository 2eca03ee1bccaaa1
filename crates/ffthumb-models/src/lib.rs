//! Shared data models for ffthumb.
//!
//! This crate provides:
//! - Timestamp parsing for thumbnail seek positions
//! - Stream selectors for audio/subtitle tracks
//! - Default extraction settings

pub mod defaults;
pub mod stream;
pub mod timestamp;

// Re-export common types
pub use stream::{StreamKind, StreamSelector};
pub use timestamp::{format_seconds, parse_timestamp, TimestampError};
