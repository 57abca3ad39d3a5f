use crate::core::persistence::DEFAULT_STORAGE_KEY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_persist() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Overrides the platform data directory.
    #[serde(default)]
    pub data_path: Option<String>,
    /// Key the form snapshot is saved under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Keep saved values on disk. When false they only live for the session.
    #[serde(default = "default_persist")]
    pub persist: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: None,
            storage_key: default_storage_key(),
            persist: default_persist(),
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, or the defaults when no file
    /// has been set up.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "gainrange", "gainrange")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "gainrange", "gainrange")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn store_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("store"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
