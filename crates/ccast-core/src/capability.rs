//! Passthrough capability tables.
//!
//! Each table maps a name reported by the prober (or a file extension) to
//! whether that property can be carried into the output unmodified. Names
//! missing from a table are never an error: [`CapabilityTable::supported`]
//! returns `false`, so unknown codecs are re-encoded instead of copied.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Accepted input file extensions (without the leading dot).
const EXTENSIONS: &[(&str, bool)] = &[
    ("mkv", true),
    ("avi", true),
    ("mp4", true),
    ("3gp", true),
    ("mov", true),
    ("mpg", true),
    ("mpeg", true),
    ("qt", true),
    ("wmv", true),
    ("m2ts", true),
    ("flv", true),
];

/// General container formats as named by mediainfo.
const FORMATS: &[(&str, bool)] = &[
    ("MPEG-4", true),
    ("Matroska", true),
    ("BDAV", false),
    ("AVI", false),
    ("Flash Video", false),
    ("Unknown", false),
];

const VIDEO_CODECS: &[(&str, bool)] = &[
    ("AVC", true),
    ("MPEG-4 Visual", false),
    ("xvid", false),
    ("MPEG Video", false),
];

// MPEG Audio and Vorbis play on Chromecast but not on iOS senders.
const AUDIO_CODECS: &[(&str, bool)] = &[
    ("AAC", true),
    ("MPEG Audio", false),
    ("Vorbis", false),
    ("Ogg", false),
    ("AC-3", false),
    ("DTS", false),
    ("PCM", false),
];

/// A closed name -> passthrough-safe mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityTable {
    entries: HashMap<String, bool>,
}

impl CapabilityTable {
    fn from_static(entries: &[(&str, bool)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|&(name, ok)| (name.to_string(), ok))
                .collect(),
        }
    }

    /// Whether `name` is listed and marked passthrough-safe.
    ///
    /// Absent names yield `false`. Matching is exact and case-sensitive.
    pub fn supported(&self, name: &str) -> bool {
        self.entries.get(name).copied().unwrap_or(false)
    }

    /// Whether `name` is listed at all, regardless of passthrough safety.
    #[cfg(test)]
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn overlay(&mut self, overrides: &BTreeMap<String, bool>) {
        for (name, &ok) in overrides {
            self.entries.insert(name.clone(), ok);
        }
    }
}

/// Extra or replacement table entries read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityOverrides {
    pub extensions: BTreeMap<String, bool>,
    pub formats: BTreeMap<String, bool>,
    pub video_codecs: BTreeMap<String, bool>,
    pub audio_codecs: BTreeMap<String, bool>,
}

/// The four capability tables consulted while processing a file.
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub extensions: CapabilityTable,
    pub formats: CapabilityTable,
    pub video_codecs: CapabilityTable,
    pub audio_codecs: CapabilityTable,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            extensions: CapabilityTable::from_static(EXTENSIONS),
            formats: CapabilityTable::from_static(FORMATS),
            video_codecs: CapabilityTable::from_static(VIDEO_CODECS),
            audio_codecs: CapabilityTable::from_static(AUDIO_CODECS),
        }
    }
}

impl Capabilities {
    /// Built-in tables with `overrides` applied on top.
    pub fn with_overrides(overrides: &CapabilityOverrides) -> Self {
        let mut caps = Self::default();
        caps.extensions.overlay(&overrides.extensions);
        caps.formats.overlay(&overrides.formats);
        caps.video_codecs.overlay(&overrides.video_codecs);
        caps.audio_codecs.overlay(&overrides.audio_codecs);
        caps
    }
}
