//! Configuration file handling for ~/.warptile/config.ini.
//!
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::fetcher::FetcherConfig;
use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// No endpoint configured
    #[error("No endpoint configured: set [endpoint] url in {0} or pass --endpoint")]
    MissingEndpoint(PathBuf),

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.warptile/config.ini).
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Build a [`FetcherConfig`] from these settings.
    ///
    /// `endpoint_override` takes precedence over `[endpoint] url`.
    pub fn to_fetcher_config(
        &self,
        endpoint_override: Option<&str>,
    ) -> Result<FetcherConfig, ConfigFileError> {
        let endpoint = endpoint_override
            .or(self.endpoint.url.as_deref())
            .ok_or_else(|| ConfigFileError::MissingEndpoint(config_file_path()))?;

        let mut config = FetcherConfig::new(endpoint)
            .with_size(self.tile.width, self.tile.height)
            .with_bands(self.tile.bands.clone())
            .with_cache(self.cache.enabled)
            .with_max_cache_size(self.cache.max_entries)
            .with_coalescing(self.cache.coalesce)
            .with_user_agent(self.endpoint.user_agent.clone());
        if let Some(secs) = self.endpoint.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

/// Get the path to the config directory (~/.warptile).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".warptile")
}

/// Get the path to the config file (~/.warptile/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
