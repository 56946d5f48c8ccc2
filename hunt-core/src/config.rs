use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::db::{BackendType, DatabaseConfig};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "HUNT_CONFIG";

/// Environment variable naming the database file
pub const DB_ENV_VAR: &str = "HUNT_DB";

/// Errors loading or saving the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to write config file {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Failed to determine config directory")]
    NoConfigDir,
}

/// Settings read from the YAML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Values supplied on the command line or environment, overriding the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db_path: Option<PathBuf>,
    pub backend: Option<BackendType>,
}

impl Config {
    /// Loads the config from the provided path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, otherwise the default config file if it exists,
    /// otherwise built-in defaults
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match get_config_path() {
            Ok(path) if path.exists() => {
                log::debug!("Loading config from {:?}", path);
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Renders the config as it would be saved
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Save the config to the specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_yaml()?;

        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        // Ensure parent directories exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        fs::write(path, content).map_err(write_err)
    }

    /// Applies overrides; a set override always beats the file
    ///
    /// A new database path without an explicit backend drops the file's
    /// backend, so the backend is inferred from the new path's extension.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(path) = &overrides.db_path {
            self.database.path = path.clone();
            self.database.backend = overrides.backend;
        }
        if let Some(backend) = overrides.backend {
            self.database.backend = Some(backend);
        }
    }
}

impl Overrides {
    /// Fills unset values from the environment
    pub fn with_env(mut self) -> Self {
        if self.db_path.is_none() {
            self.db_path = std::env::var_os(DB_ENV_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from);
        }
        self
    }
}

/// Gets the path to the config file
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("treasure-hunt").join("config.yaml"))
}
