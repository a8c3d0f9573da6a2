use ccast_core::Container;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chromecastise")]
#[command(author, version, about = "Convert video files into a Chromecast compatible format")]
pub struct Cli {
    /// Files to convert
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Convert to mp4 container format (default)
    #[arg(long, conflicts_with = "mkv")]
    pub mp4: bool,

    /// Convert to mkv container format
    #[arg(long)]
    pub mkv: bool,

    /// Suffix appended to the output file name
    #[arg(short, long, default_value = "_new", value_parser = parse_suffix)]
    pub suffix: String,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Show the encode plan for each file without running ffmpeg
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (overrides --verbose; RUST_LOG overrides both)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Console)]
    pub log_format: LogFormat,
}

impl Cli {
    /// The container selected by `--mp4` / `--mkv`.
    pub fn container(&self) -> Container {
        if self.mkv {
            Container::Mkv
        } else {
            Container::Mp4
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Console,
    Json,
    /// Discard all log output
    None,
}

// An empty suffix would let a re-encode overwrite its own source.
fn parse_suffix(s: &str) -> Result<String, String> {
    if s.is_empty() {
        Err("suffix must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}
