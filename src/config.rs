// SPDX-License-Identifier: GPL-3.0-only

//! User configuration handling
//!
//! A session is configured once at startup: the zone ladder, the query TTL
//! and write policy, the sensor parameters and the log location. Configs
//! load from a JSON file or resolve from a named preset.

use crate::backends::sensor::SessionConfig;
use crate::constants::{DEFAULT_CSV_FILE, DEFAULT_QUERY_TTL_MS, LadderPreset};
use crate::engine::ladder::ZoneLadder;
use crate::engine::query::QueryPolicy;
use crate::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Zone thresholds in meters, strictly ascending
    pub thresholds_m: Vec<f32>,
    /// Per-zone minimum re-alert intervals in milliseconds
    pub cooldowns_ms: Vec<u64>,
    /// Time-to-live for pending point queries in milliseconds
    pub query_ttl_ms: u64,
    /// What happens to a query after its first resolution
    pub query_policy: QueryPolicy,
    /// Distance log location; `None` means `distance_data.csv` in the
    /// working directory
    pub output_csv: Option<PathBuf>,
    /// Sensor session parameters
    pub sensor: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_preset(LadderPreset::default())
    }
}

impl Config {
    /// Config with a preset's ladder and the default everything-else
    pub fn from_preset(preset: LadderPreset) -> Self {
        Self {
            thresholds_m: preset.thresholds_m().to_vec(),
            cooldowns_ms: preset.cooldowns_ms().to_vec(),
            query_ttl_ms: DEFAULT_QUERY_TTL_MS,
            query_policy: QueryPolicy::default(),
            output_csv: None,
            sensor: SessionConfig::default(),
        }
    }

    /// Load a config from a JSON file
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        // Surface ladder problems at load time, not first tick
        config.ladder()?;
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::Config(format!("{}: {}", parent.display(), e)))?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::Config(e.to_string()))?;
        std::fs::write(path, contents)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Default config file location under the user config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("depth-sentinel").join("config.json"))
    }

    /// Build the validated zone ladder
    pub fn ladder(&self) -> Result<ZoneLadder, EngineError> {
        ZoneLadder::from_ms(&self.thresholds_m, &self.cooldowns_ms)
    }

    /// Query TTL as a duration
    pub fn query_ttl(&self) -> Duration {
        Duration::from_millis(self.query_ttl_ms)
    }

    /// Resolved distance log path
    pub fn csv_path(&self) -> PathBuf {
        self.output_csv
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_FILE))
    }
}
