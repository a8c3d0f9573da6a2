//! Shared test harness for CLI integration tests.
//!
//! Provides [`FakeTools`], a scratch directory holding shell-script stand-ins
//! for mediainfo and ffmpeg plus a config file pointing at them.

#![cfg(unix)]
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// mediainfo stand-in: answers from `<file>.probe` next to the media file
/// (three lines: container, video, audio) and fails when it is missing.
const FAKE_MEDIAINFO: &str = r#"#!/bin/sh
section="$1"
file="$2"
[ -f "$file.probe" ] || { echo "unable to open $file" >&2; exit 1; }
case "$section" in
  *General*) sed -n 1p "$file.probe" ;;
  *Video*) sed -n 2p "$file.probe" ;;
  *Audio*) sed -n 3p "$file.probe" ;;
esac
"#;

pub struct FakeTools {
    pub dir: TempDir,
    pub config: PathBuf,
    pub ffmpeg_log: PathBuf,
}

impl FakeTools {
    /// Fake tools whose ffmpeg records its arguments and creates the output.
    pub fn new() -> Self {
        Self::with_ffmpeg_body(
            r#"for last; do :; done
echo "$@" >> "$FFMPEG_LOG"
touch "$last""#,
        )
    }

    /// Fake tools with a custom ffmpeg script body.
    pub fn with_ffmpeg_body(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let ffmpeg_log = dir.path().join("ffmpeg.log");

        let mediainfo = write_script(dir.path(), "mediainfo", FAKE_MEDIAINFO);
        let ffmpeg = write_script(
            dir.path(),
            "ffmpeg",
            &format!(
                "#!/bin/sh\n\
                 [ \"$1\" = -version ] && {{ echo 'ffmpeg version fake'; exit 0; }}\n\
                 FFMPEG_LOG='{}'\n{body}\n",
                ffmpeg_log.display()
            ),
        );

        let config = dir.path().join("chromecastise.toml");
        fs::write(
            &config,
            format!(
                "[tools]\nmediainfo_path = \"{}\"\nffmpeg_path = \"{}\"\n\n[encode]\nthreads = 2\n",
                mediainfo.display(),
                ffmpeg.display()
            ),
        )
        .unwrap();

        Self {
            dir,
            config,
            ffmpeg_log,
        }
    }

    /// Create an empty media file with the given probe answers.
    pub fn media(&self, name: &str, container: &str, video: &str, audio: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, b"").unwrap();
        fs::write(
            self.dir.path().join(format!("{name}.probe")),
            format!("{container}\n{video}\n{audio}\n"),
        )
        .unwrap();
        path
    }

    /// Lines written by the fake ffmpeg, one per invocation.
    pub fn ffmpeg_calls(&self) -> Vec<String> {
        fs::read_to_string(&self.ffmpeg_log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

fn write_script(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
