//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML. Every section
//! defaults sensibly so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::capability::{Capabilities, CapabilityOverrides};
use crate::error::Result;
use crate::Error;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub encode: EncodeConfig,
    pub capabilities: CapabilityOverrides,
}

impl Config {
    /// Parse and check a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| Error::Config(format!("config parse error: {e}")))?;
        config.check()?;
        Ok(config)
    }

    /// Read and parse the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_toml(&contents)
    }

    /// Hard errors that make the configuration unusable.
    pub fn check(&self) -> Result<()> {
        if self.encode.video_encoder.trim().is_empty() {
            return Err(Error::Config("encode.video_encoder must not be empty".into()));
        }
        if self.encode.audio_encoder.trim().is_empty() {
            return Err(Error::Config("encode.audio_encoder must not be empty".into()));
        }
        if self.encode.threads == Some(0) {
            return Err(Error::Config("encode.threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (name, path) in [
            ("ffmpeg_path", &self.tools.ffmpeg_path),
            ("mediainfo_path", &self.tools.mediainfo_path),
        ] {
            if let Some(p) = path {
                if !p.exists() {
                    warnings.push(format!(
                        "tools.{name} {} does not exist; falling back to PATH",
                        p.display()
                    ));
                }
            }
        }

        for ext in self.capabilities.extensions.keys() {
            if ext.starts_with('.') {
                warnings.push(format!(
                    "capabilities.extensions key {ext:?} has a leading dot and will never match"
                ));
            }
        }

        if self.encode.timeout_secs == 0 {
            warnings.push("encode.timeout_secs is 0; every encode will time out".into());
        }

        warnings
    }

    /// Capability tables with this config's overrides applied.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::with_overrides(&self.capabilities)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Paths to external tools. `None` means "search PATH".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub mediainfo_path: Option<PathBuf>,
}

/// Encoder settings used when a stream has to be re-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// Encoder for video streams that cannot be copied.
    pub video_encoder: String,
    /// Encoder for audio streams that cannot be copied.
    pub audio_encoder: String,
    pub audio_bitrate: String,
    pub preset: String,
    pub level: String,
    pub crf: u8,
    /// Encoder threads; `None` uses the number of logical CPUs.
    pub threads: Option<usize>,
    pub timeout_secs: u64,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            video_encoder: "libx264".into(),
            audio_encoder: "aac".into(),
            audio_bitrate: "128k".into(),
            preset: "slow".into(),
            level: "4.0".into(),
            crf: 20,
            threads: None,
            timeout_secs: 86400,
        }
    }
}

impl EncodeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
