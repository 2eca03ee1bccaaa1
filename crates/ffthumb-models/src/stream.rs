//! Stream selection for multi-track containers.

use std::fmt;

/// Kind of elementary stream an extraction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Audio,
    Subtitle,
}

impl StreamKind {
    /// Stream type letter used in ffmpeg stream specifiers.
    pub fn specifier(&self) -> &'static str {
        match self {
            StreamKind::Audio => "a",
            StreamKind::Subtitle => "s",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Audio => write!(f, "audio"),
            StreamKind::Subtitle => write!(f, "subtitle"),
        }
    }
}

/// A specific stream of the first input, e.g. the second audio track.
///
/// Renders as the `-map` argument `0:a:1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamSelector {
    pub kind: StreamKind,
    pub index: u32,
}

impl StreamSelector {
    pub fn audio(index: u32) -> Self {
        Self {
            kind: StreamKind::Audio,
            index,
        }
    }

    pub fn subtitle(index: u32) -> Self {
        Self {
            kind: StreamKind::Subtitle,
            index,
        }
    }

    /// The `-map` value selecting this stream from input 0.
    pub fn map_spec(&self) -> String {
        format!("0:{}:{}", self.kind.specifier(), self.index)
    }
}

impl fmt::Display for StreamSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stream #{}", self.kind, self.index)
    }
}
