//! Encode planning: turns probed metadata into an [`EncodePlan`].
//!
//! Planning is pure. It never touches the filesystem or spawns processes, so
//! every decision can be unit-tested from a [`MediaProbe`] alone.

use std::path::{Path, PathBuf};

use crate::capability::Capabilities;
use crate::media::{Container, MediaProbe, StreamAction};

/// What the encoder must do for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodePlan {
    pub video: StreamAction,
    pub audio: StreamAction,
    pub container: Container,
    /// Destination next to the source file.
    pub output: PathBuf,
    /// Nothing to do: both streams copy and the source already has the
    /// target container's extension.
    pub skip: bool,
}

/// Maps probe results to plans using a fixed set of capability tables and
/// fallback encoders.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    capabilities: &'a Capabilities,
    video_encoder: &'a str,
    audio_encoder: &'a str,
}

impl<'a> Planner<'a> {
    pub fn new(
        capabilities: &'a Capabilities,
        video_encoder: &'a str,
        audio_encoder: &'a str,
    ) -> Self {
        Self {
            capabilities,
            video_encoder,
            audio_encoder,
        }
    }

    /// Decide the stream actions and output path for `source`.
    pub fn plan(
        &self,
        probe: &MediaProbe,
        source: &Path,
        target: Container,
        suffix: &str,
    ) -> EncodePlan {
        let video = if self.capabilities.video_codecs.supported(&probe.video_codec) {
            StreamAction::Copy
        } else {
            StreamAction::Encode(self.video_encoder.to_string())
        };

        let audio = if self.capabilities.audio_codecs.supported(&probe.audio_codec) {
            StreamAction::Copy
        } else {
            StreamAction::Encode(self.audio_encoder.to_string())
        };

        let same_extension =
            source.extension().and_then(|e| e.to_str()) == Some(target.extension());
        let skip = video.is_copy() && audio.is_copy() && same_extension;

        EncodePlan {
            video,
            audio,
            container: target,
            output: output_path(source, target, suffix),
            skip,
        }
    }
}

/// `<dir>/<stem><suffix>.<container>` for the given source.
///
/// The stem is kept byte for byte, so non-UTF-8 names survive.
pub fn output_path(source: &Path, target: Container, suffix: &str) -> PathBuf {
    let mut name = source.file_stem().unwrap_or_default().to_os_string();
    name.push(suffix);
    name.push(".");
    name.push(target.extension());
    source.with_file_name(name)
}
