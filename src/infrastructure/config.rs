//! Navigator configuration, read from a TOML file.
//!
//! ```toml
//! [playback]
//! interval_ms = 1500
//!
//! [trace]
//! max_depth = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Playback interval must be greater than 0.
    #[error("Invalid playback interval: must be greater than 0")]
    InvalidInterval,

    /// Trace depth must be greater than 0.
    #[error("Invalid max trace depth: must be greater than 0")]
    InvalidMaxDepth,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavigatorConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Milliseconds between steps (default: 1500).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Depth passed to the engine's trace query (default: 10).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_interval_ms() -> u64 {
    1500
}

fn default_max_depth() -> usize {
    10
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl NavigatorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.playback.interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        if self.trace.max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth);
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.playback.interval_ms)
    }
}
