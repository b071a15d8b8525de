use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::ConfigError;

use super::ControllerConfig;

/// On-disk home of the controller configuration. The document is written
/// exactly once (quick-start) and cached for every read after that.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    current: RwLock<Option<ControllerConfig>>,
}

impl ConfigStore {
    /// Opens the store, loading an existing config file when present.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing config file cannot be read or
    /// parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let current = if path.exists() {
            Some(load_config_file(&path)?)
        } else {
            None
        };
        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    pub async fn get(&self) -> Option<ControllerConfig> {
        self.current.read().await.clone()
    }

    /// Generates the configuration on first-run setup and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadyInitialized`] when a config already
    /// exists, or a write error when persisting fails.
    pub async fn initialize(
        &self,
        admin: String,
        password: String,
        root_url: String,
    ) -> Result<ControllerConfig, ConfigError> {
        let mut current = self.current.write().await;
        if current.is_some() || self.path.exists() {
            return Err(ConfigError::AlreadyInitialized);
        }

        let config = ControllerConfig {
            admin,
            password,
            root_url,
            random_key: Uuid::new_v4().to_string(),
        };
        let body = serde_json::to_vec_pretty(&config)
            .map_err(|err| ConfigError::SerializeConfig { source: err })?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|err| ConfigError::WriteConfig {
                path: self.path.clone(),
                source: err,
            })?;

        info!("Generated controller config at {}", self.path.display());
        *current = Some(config.clone());
        Ok(config)
    }
}

fn load_config_file(path: &Path) -> Result<ControllerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|err| ConfigError::ReadConfig {
        path: path.to_path_buf(),
        source: err,
    })?;
    serde_json::from_str(&content).map_err(|err| ConfigError::ParseConfig {
        path: path.to_path_buf(),
        source: err,
    })
}
