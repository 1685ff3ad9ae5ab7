//! Scheduling configuration for the recurring market jobs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Interval settings for the four recurring jobs, in seconds.
///
/// Defaults mirror a live game session: prices move every minute, events land
/// every three minutes, the watchdog checks every minute, and portfolio
/// snapshots are taken every five.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    pub price_tick_secs: u64,
    pub event_injection_secs: u64,
    pub watchdog_secs: u64,
    pub snapshot_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            price_tick_secs: 60,
            event_injection_secs: 180,
            watchdog_secs: 60,
            snapshot_secs: 300,
        }
    }
}

impl JobsConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse jobs config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read jobs config at {}", path.display()))?;
        Self::from_toml_str(&raw)
    }

    pub fn price_tick_interval(&self) -> Duration {
        Duration::from_secs(self.price_tick_secs)
    }

    pub fn event_injection_interval(&self) -> Duration {
        Duration::from_secs(self.event_injection_secs)
    }

    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_secs(self.watchdog_secs)
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot_secs)
    }
}
