use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::relations::KeywordClassifier;
use crate::sim::SimulationConfig;

/// Top-level settings, read from an optional JSON file. Every field falls back
/// to its default when absent.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub simulation: SimulationConfig,
    pub classifier: KeywordClassifier,
    pub resize_debounce_ms: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            classifier: KeywordClassifier::default(),
            resize_debounce_ms: 100,
        }
    }
}

impl GraphConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("config is not valid JSON for this schema")
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
