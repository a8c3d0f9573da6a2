//! Conversion of a planned file with ffmpeg.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ccast_core::{EncodeConfig, EncodePlan, Error, Result};
use tokio_util::sync::CancellationToken;

use crate::command::{ToolCommand, ToolOutput};

/// x264 tuning applied whenever the video stream is re-encoded.
const X264_TUNING: &[&str] = &["-bf", "16", "-b_strategy", "2", "-subq", "10"];

/// Something that can carry out an [`EncodePlan`].
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Human-readable name identifying this implementation.
    fn name(&self) -> &'static str;

    /// Convert `source` according to `plan`, killing the work if `cancel`
    /// fires.
    async fn encode(
        &self,
        plan: &EncodePlan,
        source: &Path,
        cancel: &CancellationToken,
    ) -> Result<ToolOutput>;
}

/// An [`Encoder`] that shells out to the `ffmpeg` CLI.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg_path: PathBuf,
    settings: EncodeConfig,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg_path: PathBuf, settings: EncodeConfig) -> Self {
        Self {
            ffmpeg_path,
            settings,
        }
    }

    fn threads(&self) -> usize {
        self.settings.threads.unwrap_or_else(num_cpus::get)
    }

    /// The full ffmpeg argument vector for `plan`. The output path is always
    /// the last argument.
    pub fn build_args(&self, plan: &EncodePlan, source: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-threads".into(),
            self.threads().to_string().into(),
            "-i".into(),
            source.as_os_str().to_os_string(),
            "-map".into(),
            "0:v:0".into(),
            // Optional: a file without audio still encodes.
            "-map".into(),
            "0:a:0?".into(),
        ];

        args.extend(["-c:v".into(), plan.video.as_str().into()]);
        if !plan.video.is_copy() {
            args.extend([
                "-preset".into(),
                self.settings.preset.as_str().into(),
                "-level".into(),
                self.settings.level.as_str().into(),
                "-crf".into(),
                self.settings.crf.to_string().into(),
            ]);
            args.extend(X264_TUNING.iter().map(OsString::from));
        }

        args.extend(["-c:a".into(), plan.audio.as_str().into()]);
        if !plan.audio.is_copy() {
            args.extend(["-b:a".into(), self.settings.audio_bitrate.as_str().into()]);
        }

        if plan.container.supports_subtitles() {
            args.extend(["-map", "0:s?", "-c:s", "copy"].map(OsString::from));
        }

        args.extend(["-strict", "-2", "-y"].map(OsString::from));
        args.push(plan.output.as_os_str().to_os_string());
        args
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn encode(
        &self,
        plan: &EncodePlan,
        source: &Path,
        cancel: &CancellationToken,
    ) -> Result<ToolOutput> {
        if plan.output == source {
            return Err(Error::Config(format!(
                "output path {} would overwrite the source",
                plan.output.display()
            )));
        }

        let mut cmd = ToolCommand::new(self.ffmpeg_path.clone());
        cmd.args(self.build_args(plan, source));
        cmd.timeout(self.settings.timeout());
        cmd.cancel_on(cancel.clone());

        tracing::info!(
            "Encoding {} -> {} (video={}, audio={})",
            source.display(),
            plan.output.display(),
            plan.video,
            plan.audio,
        );
        tracing::debug!("{} {}", cmd.program_name(), cmd.display_args().join(" "));

        let output = cmd.output().await?;
        if !output.success() {
            return Err(Error::Encode {
                path: source.to_path_buf(),
                output: output.combined(),
                program: output.program,
                args: output.args,
                status: output.status,
            });
        }

        Ok(output)
    }
}
