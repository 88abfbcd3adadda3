use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Loaded from `config.toml`; CLI flags override individual fields.
/// A missing file or missing keys fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load config from the default location
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, or defaults if the file doesn't exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml(&contents)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        toml::from_str(contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config_dir>/quotebox/config.toml`
    pub fn config_path() -> crate::Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("quotebox")
            .join("config.toml"))
    }

    /// Where the durable store lives: the configured directory, or
    /// `<data_dir>/quotebox`
    pub fn data_dir(&self) -> crate::Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(dirs::data_dir()
                .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
                .join("quotebox")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Records requested per sync
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Category given to every synced quote
    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_endpoint() -> String {
    quotebox_api::DEFAULT_FEED_URL.to_string()
}

fn default_batch_size() -> usize {
    5
}

fn default_interval_secs() -> u64 {
    crate::sync::DEFAULT_SYNC_INTERVAL.as_secs()
}

fn default_category() -> String {
    "Server".to_string()
}

fn default_max_retries() -> u32 {
    3
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            batch_size: default_batch_size(),
            interval_secs: default_interval_secs(),
            category: default_category(),
            max_retries: default_max_retries(),
        }
    }
}
