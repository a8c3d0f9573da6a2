//! # ccast-av
//!
//! External tool plumbing for chromecastise.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg
//!   and mediainfo.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout and
//!   cancellation support for running external processes.
//! - **Inspection** ([`MediaInfoInspector`]) -- implements [`Inspector`] by
//!   querying mediainfo for the container, video and audio formats.
//! - **Encoding** ([`FfmpegEncoder`]) -- implements [`Encoder`] by running
//!   ffmpeg with the stream actions of an [`ccast_core::EncodePlan`].

pub mod command;
pub mod encode;
pub mod inspect;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use encode::{Encoder, FfmpegEncoder};
pub use inspect::{check_extension, Inspector, MediaInfoInspector, Section};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
