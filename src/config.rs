//! Runtime configuration
//!
//! Settings shared by every invocation that runs through a runtime or an
//! execution context. All fields have defaults, so a partial JSON document
//! is enough to override a single setting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Root directory of the local media store
    pub media_root: PathBuf,
    /// Reject events whose name or value does not match the output schema
    pub strict_outputs: bool,
    /// Let dictionary lookups read named attributes of list elements and
    /// records when no key matches directly. Off by default: a list whose
    /// first element lacks the key then projects to `[]`.
    pub attribute_lookup: bool,
    /// Log every emitted event at trace level
    pub log_events: bool,
}

impl RuntimeConfig {
    /// Parse a configuration from JSON
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Set the media root
    pub fn with_media_root(mut self, media_root: impl Into<PathBuf>) -> Self {
        self.media_root = media_root.into();
        self
    }

    /// Enable or disable strict output checking
    pub fn with_strict_outputs(mut self, strict: bool) -> Self {
        self.strict_outputs = strict;
        self
    }

    /// Enable or disable attribute lookup
    pub fn with_attribute_lookup(mut self, enabled: bool) -> Self {
        self.attribute_lookup = enabled;
        self
    }

    /// Enable or disable per-event logging
    pub fn with_log_events(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            media_root: std::env::temp_dir().join("basic-blocks"),
            strict_outputs: true,
            attribute_lookup: false,
            log_events: false,
        }
    }
}
