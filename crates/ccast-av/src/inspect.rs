//! Media inspection backed by the `mediainfo` CLI.
//!
//! Each file is queried three times with `--Inform=<Section>;%Format%`, once
//! for the general container and once each for the first video and audio
//! stream. The trimmed stdout of each call is the raw metadata string.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ccast_core::{Capabilities, Error, MediaProbe, Result};
use tokio_util::sync::CancellationToken;

use crate::command::ToolCommand;

/// Timeout for a single mediainfo query.
const PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Something that can inspect a media file's container and codecs.
#[async_trait]
pub trait Inspector: Send + Sync {
    /// Human-readable name identifying this implementation.
    fn name(&self) -> &'static str;

    /// Inspect `path`, honouring `cancel` inside every blocking call.
    async fn inspect(&self, path: &Path, cancel: &CancellationToken) -> Result<MediaProbe>;
}

/// The mediainfo report section to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    General,
    Video,
    Audio,
}

impl Section {
    /// The `--Inform` argument selecting this section's format name.
    pub fn inform_arg(&self) -> &'static str {
        match self {
            Section::General => "--Inform=General;%Format%",
            Section::Video => "--Inform=Video;%Format%",
            Section::Audio => "--Inform=Audio;%Format%",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Section::General => "container format",
            Section::Video => "video codec",
            Section::Audio => "audio codec",
        }
    }
}

/// Check that `path` has an accepted input extension, returning it.
///
/// The extension is compared as given (no case folding) without its dot.
pub fn check_extension<'p>(path: &'p Path, capabilities: &Capabilities) -> Result<&'p str> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !capabilities.extensions.supported(ext) {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ext.to_string(),
        });
    }
    Ok(ext)
}

/// An [`Inspector`] backed by the `mediainfo` CLI.
#[derive(Debug, Clone)]
pub struct MediaInfoInspector {
    mediainfo_path: PathBuf,
    capabilities: Arc<Capabilities>,
}

impl MediaInfoInspector {
    pub fn new(mediainfo_path: PathBuf, capabilities: Arc<Capabilities>) -> Self {
        Self {
            mediainfo_path,
            capabilities,
        }
    }

    /// Run one mediainfo query and return its trimmed stdout.
    async fn query(
        &self,
        path: &Path,
        section: Section,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let mut cmd = ToolCommand::new(self.mediainfo_path.clone());
        cmd.arg(section.inform_arg());
        cmd.arg(path);
        cmd.timeout(PROBE_TIMEOUT);
        cmd.cancel_on(cancel.clone());

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(e) => {
                return Err(Error::probe(
                    path,
                    format!("mediainfo failed to get the {}: {e}", section.describe()),
                ))
            }
        };

        if !output.success() {
            return Err(Error::probe(
                path,
                format!(
                    "mediainfo failed to get the {}: exited with {}: {}",
                    section.describe(),
                    output.status,
                    output.stderr.trim()
                ),
            ));
        }

        Ok(output.stdout.trim().to_string())
    }
}

#[async_trait]
impl Inspector for MediaInfoInspector {
    fn name(&self) -> &'static str {
        "mediainfo"
    }

    async fn inspect(&self, path: &Path, cancel: &CancellationToken) -> Result<MediaProbe> {
        check_extension(path, &self.capabilities)?;

        let container = self.query(path, Section::General, cancel).await?;
        let video_codec = self.query(path, Section::Video, cancel).await?;
        let audio_codec = self.query(path, Section::Audio, cancel).await?;

        tracing::debug!(
            "[{}] container={container:?} (passthrough: {}) \
             video={video_codec:?} audio={audio_codec:?}",
            path.display(),
            self.capabilities.formats.supported(&container),
        );

        Ok(MediaProbe {
            container,
            video_codec,
            audio_codec,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inform_args() {
        assert_eq!(Section::General.inform_arg(), "--Inform=General;%Format%");
        assert_eq!(Section::Video.inform_arg(), "--Inform=Video;%Format%");
        assert_eq!(Section::Audio.inform_arg(), "--Inform=Audio;%Format%");
    }

    #[test]
    fn check_extension_accepts_known() {
        let caps = Capabilities::default();
        assert_eq!(check_extension(Path::new("/m/a.mkv"), &caps).unwrap(), "mkv");
        assert_eq!(check_extension(Path::new("b.m2ts"), &caps).unwrap(), "m2ts");
    }

    #[test]
    fn check_extension_rejects_unknown_and_missing() {
        let caps = Capabilities::default();
        for p in ["song.flac", "noext", "UPPER.MKV", "archive.mkv.zip"] {
            let err = check_extension(Path::new(p), &caps).unwrap_err();
            assert!(matches!(err, Error::UnsupportedFormat { .. }), "{p}: {err}");
        }
    }

    #[tokio::test]
    async fn unsupported_extension_spawns_nothing() {
        // A prober path that cannot exist: any spawn attempt would surface
        // as a probe error instead of UnsupportedFormat.
        let inspector = MediaInfoInspector::new(
            PathBuf::from("/nonexistent/mediainfo-xyz"),
            Arc::new(Capabilities::default()),
        );
        let err = inspector
            .inspect(Path::new("notes.txt"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn missing_prober_is_probe_error() {
        let inspector = MediaInfoInspector::new(
            PathBuf::from("/nonexistent/mediainfo-xyz"),
            Arc::new(Capabilities::default()),
        );
        let err = inspector
            .inspect(Path::new("movie.mkv"), &CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            Error::Probe { path, message } => {
                assert_eq!(path, PathBuf::from("movie.mkv"));
                assert!(message.contains("container format"), "got: {message}");
            }
            other => panic!("expected probe error, got {other}"),
        }
    }

    #[cfg(unix)]
    mod fake_mediainfo {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn write_script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("mediainfo");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn inspector(script: PathBuf) -> MediaInfoInspector {
            MediaInfoInspector::new(script, Arc::new(Capabilities::default()))
        }

        #[tokio::test]
        async fn parses_and_trims_each_section() {
            let dir = tempfile::tempdir().unwrap();
            let script = write_script(
                dir.path(),
                r#"case "$1" in
  *General*) printf '  Matroska \n' ;;
  *Video*) printf 'AVC\n' ;;
  *Audio*) printf '\tAC-3\n\n' ;;
esac"#,
            );

            let probe = inspector(script)
                .inspect(Path::new("movie.mkv"), &CancellationToken::new())
                .await
                .unwrap();
            assert_eq!(probe, MediaProbe::new("Matroska", "AVC", "AC-3"));
        }

        #[tokio::test]
        async fn audio_failure_is_probe_error_for_that_file() {
            let dir = tempfile::tempdir().unwrap();
            let script = write_script(
                dir.path(),
                r#"case "$1" in
  *Audio*) echo "cannot read audio" >&2; exit 1 ;;
  *) echo AVC ;;
esac"#,
            );

            let err = inspector(script)
                .inspect(Path::new("bad.mkv"), &CancellationToken::new())
                .await
                .unwrap_err();
            match err {
                Error::Probe { path, message } => {
                    assert_eq!(path, PathBuf::from("bad.mkv"));
                    assert!(message.contains("audio codec"), "got: {message}");
                    assert!(message.contains("cannot read audio"), "got: {message}");
                }
                other => panic!("expected probe error, got {other}"),
            }
        }

        #[tokio::test]
        async fn non_utf8_path_reaches_mediainfo_intact() {
            use std::ffi::OsStr;
            use std::os::unix::ffi::OsStrExt;

            let dir = tempfile::tempdir().unwrap();
            let media = dir.path().join(OsStr::from_bytes(b"caf\xe9.mkv"));
            std::fs::write(&media, b"").unwrap();
            let script = write_script(
                dir.path(),
                r#"[ -f "$2" ] || { echo "no such file: $2" >&2; exit 1; }
case "$1" in
  *General*) echo Matroska ;;
  *Video*) echo AVC ;;
  *Audio*) echo AAC ;;
esac"#,
            );

            let probe = inspector(script)
                .inspect(&media, &CancellationToken::new())
                .await
                .unwrap();
            assert_eq!(probe, MediaProbe::new("Matroska", "AVC", "AAC"));
        }

        #[tokio::test]
        async fn failed_query_reports_exit_status_once() {
            let dir = tempfile::tempdir().unwrap();
            let script = write_script(dir.path(), "exit 1");

            let err = inspector(script)
                .inspect(Path::new("movie.mkv"), &CancellationToken::new())
                .await
                .unwrap_err()
                .to_string();
            assert!(err.contains("exited with exit status: 1"), "got: {err}");
            assert!(!err.contains("with status"), "got: {err}");
        }

        #[tokio::test]
        async fn cancellation_during_probe() {
            let dir = tempfile::tempdir().unwrap();
            let script = write_script(dir.path(), "sleep 10");
            let token = CancellationToken::new();
            let trigger = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                trigger.cancel();
            });

            let err = inspector(script)
                .inspect(Path::new("movie.mkv"), &token)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Cancelled), "got: {err}");
        }
    }
}
