//! Storage configuration persistence
//!
//! Keeps the storage configuration as a JSON file in the app data directory.
//! Nothing caches it: every sync attempt loads the current file.

use crate::config::STORAGE_CONFIG_FILE;
use crate::error::{AppError, Result};
use crate::models::StorageConfig;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-backed store for [`StorageConfig`]
#[derive(Clone, Debug)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            config_path: app_data_dir.join(STORAGE_CONFIG_FILE),
        }
    }

    /// Load the configuration, writing the default (disabled) one if missing
    pub async fn load(&self) -> Result<StorageConfig> {
        if !self.config_path.exists() {
            tracing::info!("Storage config not found, creating default config");
            let default = StorageConfig::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.config_path).await?;
        let config: StorageConfig = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse storage config: {}", e)))?;

        Ok(config)
    }

    pub async fn save(&self, config: &StorageConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await?;
        tracing::info!("Storage config saved to {:?}", self.config_path);

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}
