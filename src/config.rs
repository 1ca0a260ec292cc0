//! Engine configuration.
//!
//! The remote store defines a handful of fixed, system-owned event types the
//! engine has to reference by id: the "substitution in" event produced by
//! lineup submissions and the "period end" event. Their ids vary per
//! deployment, so they arrive via configuration rather than constants.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Event type recorded once per player in a lineup submission.
    pub substitution_event_type_id: String,
    /// Event type recorded by a period-end submission.
    pub period_end_event_type_id: String,
}

impl EngineConfig {
    /// Loads configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid engine config in {}", path.display()))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
