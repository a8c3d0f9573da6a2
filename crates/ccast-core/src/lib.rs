//! ccast-core: shared types, errors, configuration and encode planning.
//!
//! This crate is the foundational dependency for the other chromecastise
//! crates. It owns the capability tables and the pure planner that decides
//! whether a file needs re-encoding, and never spawns processes itself.

pub mod capability;
pub mod config;
pub mod error;
pub mod media;
pub mod plan;

// Re-export the most commonly used items at the crate root.
pub use capability::{Capabilities, CapabilityOverrides, CapabilityTable};
pub use config::{Config, EncodeConfig, ToolsConfig};
pub use error::{Error, Result};
pub use media::{Container, MediaProbe, StreamAction};
pub use plan::{EncodePlan, Planner};
