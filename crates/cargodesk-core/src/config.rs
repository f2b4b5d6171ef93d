//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/cargodesk/config.toml)
//! 3. Environment variables (CARGODESK_* prefix)
//!
//! Environment variables take precedence over config file values.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::substrate::{SubstrateError, SubstrateResult};

/// Environment variable prefix
const ENV_PREFIX: &str = "CARGODESK";

/// What `create` does when the supplied id already exists in the collection
///
/// The emulated service silently let a reused id shadow the old document;
/// that looseness is preserved behind `overwrite` but is not the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateIdPolicy {
    /// Fail the create with a DuplicateId error
    #[default]
    Reject,
    /// Replace the existing document in place
    Overwrite,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (one file per substrate key)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Artificial delay applied to `list`, in milliseconds, to emulate
    /// network latency. Zero disables it; correctness never depends on it.
    #[serde(default)]
    pub simulated_latency_ms: u64,

    /// Behavior when `create` is given an id that already exists
    #[serde(default)]
    pub duplicate_ids: DuplicateIdPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            simulated_latency_ms: 0,
            duplicate_ids: DuplicateIdPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (CARGODESK_DATA_DIR, CARGODESK_LATENCY_MS,
    ///    CARGODESK_DUPLICATE_IDS)
    /// 2. Config file (~/.config/cargodesk/config.toml or CARGODESK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
                path: path.clone(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml_content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source: e,
        })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // CARGODESK_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // CARGODESK_LATENCY_MS
        if let Ok(val) = std::env::var(format!("{}_LATENCY_MS", ENV_PREFIX)) {
            if let Ok(ms) = val.parse() {
                self.simulated_latency_ms = ms;
            }
        }

        // CARGODESK_DUPLICATE_IDS ("reject" or "overwrite")
        if let Ok(val) = std::env::var(format!("{}_DUPLICATE_IDS", ENV_PREFIX)) {
            match val.to_lowercase().as_str() {
                "reject" => self.duplicate_ids = DuplicateIdPolicy::Reject,
                "overwrite" => self.duplicate_ids = DuplicateIdPolicy::Overwrite,
                _ => {}
            }
        }
    }

    /// Ensure the data directory exists
    pub fn ensure_data_dir(&self) -> SubstrateResult<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir).map_err(|e| {
                SubstrateError::CreateDirectory {
                    path: self.data_dir.clone(),
                    source: e,
                }
            })?;
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_file_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(&config_path, content).map_err(|e| ConfigError::Write {
            path: config_path,
            source: e,
        })?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with CARGODESK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cargodesk")
            .join("config.toml")
    }

    /// Directory the file substrate stores its keys in
    pub fn substrate_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cargodesk")
}

/// Errors loading or saving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
