//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

use crate::fetch::DataSource;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Where the catalog and ranking files come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Remote web root serving `events.json` and `data/*`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Local directory with the same layout; used when no base URL is set
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./public")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            data_dir: default_data_dir(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of frontend files served for non-API paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Trend window size for history charts
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_history_window() -> usize {
    crate::history::DEFAULT_WINDOW
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            history_window: default_history_window(),
            source: SourceConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "History window must be greater than 0".to_string(),
            ));
        }

        if let Some(ref base) = self.source.base_url {
            Url::parse(base).map_err(|e| {
                ConfigError::ValidationError(format!("Invalid base_url {}: {}", base, e))
            })?;
        }

        Ok(())
    }

    /// The data source this configuration points at. A base URL wins over
    /// the local directory; a missing trailing slash is added so relative
    /// joins resolve under the root.
    pub fn data_source(&self) -> Result<DataSource, ConfigError> {
        match self.source.base_url {
            Some(ref base) => {
                let normalized = if base.ends_with('/') {
                    base.clone()
                } else {
                    format!("{}/", base)
                };
                let url = Url::parse(&normalized).map_err(|e| {
                    ConfigError::ValidationError(format!("Invalid base_url {}: {}", base, e))
                })?;
                Ok(DataSource::Remote { base: url })
            }
            None => Ok(DataSource::Local {
                dir: self.source.data_dir.clone(),
            }),
        }
    }
}
