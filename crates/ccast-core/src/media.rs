//! Media-domain types: target containers, stream actions and probe results.

use std::fmt;

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// Output container formats the encoder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Container {
    #[default]
    Mp4,
    Mkv,
}

impl Container {
    /// File extension for this container, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mkv => "mkv",
        }
    }

    /// Whether subtitle streams can be carried into this container as-is.
    pub fn supports_subtitles(&self) -> bool {
        matches!(self, Self::Mkv)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// ---------------------------------------------------------------------------
// StreamAction
// ---------------------------------------------------------------------------

/// What the encoder should do with one stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StreamAction {
    /// Pass the stream through untouched.
    Copy,
    /// Re-encode with the named encoder (e.g. `libx264`).
    Encode(String),
}

impl StreamAction {
    pub fn is_copy(&self) -> bool {
        matches!(self, Self::Copy)
    }

    /// The token handed to the encoder's codec option.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Copy => "copy",
            Self::Encode(encoder) => encoder,
        }
    }
}

impl fmt::Display for StreamAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MediaProbe
// ---------------------------------------------------------------------------

/// Raw metadata reported by the prober for one file.
///
/// Values are kept exactly as the prober printed them, minus surrounding
/// whitespace, so they can be matched against the capability tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaProbe {
    /// General container format, e.g. `Matroska`.
    pub container: String,
    /// Codec of the first video stream, e.g. `AVC`.
    pub video_codec: String,
    /// Codec of the first audio stream, e.g. `AAC`.
    pub audio_codec: String,
}

impl MediaProbe {
    pub fn new(
        container: impl Into<String>,
        video_codec: impl Into<String>,
        audio_codec: impl Into<String>,
    ) -> Self {
        Self {
            container: container.into(),
            video_codec: video_codec.into(),
            audio_codec: audio_codec.into(),
        }
    }
}
