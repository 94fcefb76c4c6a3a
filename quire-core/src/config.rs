//! Runtime configuration for the lifecycle core.
//!
//! Raw values come from an optional `quire.toml` section and from environment
//! variables; the environment wins over the file, the file over built-in
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub events: FileEventsConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileEventsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
}

/// Environment-derived configuration values.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub event_capacity: Option<usize>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        let mut env_config = Self::default();
        env_config.event_capacity = std::env::var("QUIRE_EVENT_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok());
        env_config
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Resolved configuration consumed by the runtime wiring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Buffer capacity of the in-process event bus.
    pub event_capacity: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl CoreConfig {
    /// Merge file and environment sources; environment wins.
    pub fn compose(file: Option<FileConfig>, env: EnvConfig) -> Self {
        let file = file.unwrap_or_default();
        Self {
            event_capacity: env
                .event_capacity
                .or(file.events.capacity)
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
        }
    }

    /// Load from a TOML file plus the current environment.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|err| ConfigError::Parse {
                path: path.to_path_buf(),
                source: err,
            })?;
        Ok(Self::compose(Some(file_config), EnvConfig::gather()))
    }
}
