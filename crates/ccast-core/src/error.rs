//! Unified error type for chromecastise.
//!
//! Every stage of the per-file pipeline funnels its failures into [`Error`].
//! The batch driver uses [`Error::is_fatal`] to decide whether a failure stays
//! confined to one file or ends the whole run.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Unified error type covering all failure modes in chromecastise.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source file extension is not an accepted input format.
    #[error("[{}] unsupported video format: {extension:?}", path.display())]
    UnsupportedFormat {
        /// The offending source file.
        path: PathBuf,
        /// Extension as given, without the leading dot (empty if none).
        extension: String,
    },

    /// The metadata prober exited non-zero or could not be started.
    #[error("[{}] probe failed: {message}", path.display())]
    Probe {
        /// The file being inspected.
        path: PathBuf,
        /// Human-readable error description from the prober.
        message: String,
    },

    /// The encoder exited non-zero.
    #[error(
        "[{}] encode failed ({status})\ncommand: {} {}\noutput:\n{}",
        path.display(),
        program,
        args.join(" "),
        output.trim_end()
    )]
    Encode {
        /// The source file being converted.
        path: PathBuf,
        /// Encoder program that was run.
        program: String,
        /// Full argument vector passed to the encoder.
        args: Vec<String>,
        /// Combined stdout and stderr of the encoder.
        output: String,
        /// Exit status of the encoder process.
        status: ExitStatus,
    },

    /// The run was interrupted.
    #[error("cancelled")]
    Cancelled,

    /// An external tool could not be found, spawned, or timed out.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Invalid configuration or command-line usage.
    #[error("Config error: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether this error must stop the whole batch rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Probe`].
    pub fn probe(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Probe {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
