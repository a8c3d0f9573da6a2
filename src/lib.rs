//! chromecastise - batch transcoder for Chromecast playback
//!
//! This library crate exposes the batch driver and configuration loading for
//! the binary and for integration testing.

pub mod batch;

pub use batch::{BatchDriver, BatchOptions, BatchReport, FileOutcome, FileReport};

use anyhow::Result;
use ccast_core::Config;
use std::path::Path;

/// Config file locations tried when `--config` is not given, in order.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "./chromecastise.toml",
    "~/.config/chromecastise/config.toml",
];

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    for warning in config.validate() {
        tracing::warn!("{}: {warning}", path.display());
    }
    Ok(config)
}

/// Load config from `custom_path`, else the first default location that
/// exists, else built-in defaults.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path_str in DEFAULT_CONFIG_PATHS {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}
