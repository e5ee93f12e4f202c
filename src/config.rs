//! Configuration loading and management
//!
//! Handles parsing of `.todo.toml` configuration files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Config file name looked up in the working directory
pub const CONFIG_FILE: &str = ".todo.toml";

/// Fallback store directory when no platform data dir is available
pub const FALLBACK_STORE_DIR: &str = ".todo";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Listing defaults
    #[serde(default)]
    pub view: ViewConfig,
}

/// Persistent store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store directory; relative paths resolve against the config file's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// How long a write waits for the store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Listing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Show only completed tasks unless overridden on the command line
    #[serde(default)]
    pub only_completed: bool,
}

impl Config {
    /// Load configuration from a `.todo.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.todo.toml` from `dir`, or return defaults if there is none
    pub fn load_from_dir(dir: &Path) -> crate::error::Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the store directory, with `base` as the anchor for relative paths
    pub fn store_dir(&self, base: &Path) -> PathBuf {
        match &self.store.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => base.join(dir),
            None => default_store_dir(base),
        }
    }

    fn validate(&self) -> crate::error::Result<()> {
        if let Some(dir) = &self.store.dir {
            if dir.as_os_str().is_empty() {
                return Err(crate::error::Error::InvalidConfig(
                    "store.dir cannot be empty".to_string(),
                ));
            }
        }
        if self.store.lock_timeout_ms == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "store.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_store_dir(base: &Path) -> PathBuf {
    directories::ProjectDirs::from("", "", "todos")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| base.join(FALLBACK_STORE_DIR))
}
