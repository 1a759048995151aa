//! Configuration loading and management
//!
//! Handles parsing of the `config.toml` file under the platform config
//! directory (or an explicit `--config` path). Every key has a default so a
//! missing file is not an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where per-owner blobs and the session file live
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Which backend stores tasks
    #[serde(default)]
    pub backend: BackendKind,

    /// Remote backend settings (ignored for the local backend)
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: BackendKind::default(),
            remote: RemoteConfig::default(),
        }
    }
}

/// Selects the persistence backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

/// Hosted backend connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the REST endpoint, e.g. `https://x.example.co/rest/v1`
    #[serde(default)]
    pub url: String,

    /// Project API key sent on every request
    #[serde(default)]
    pub api_key: String,

    /// Bearer token for the signed-in user; falls back to the API key
    #[serde(default)]
    pub token: Option<String>,
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "tsk")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".tsk"))
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tsk")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    /// Load configuration from an explicit path or the platform default.
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.backend == BackendKind::Remote {
            if self.remote.url.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "remote.url is required when backend = \"remote\"".to_string(),
                ));
            }
            if self.remote.api_key.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "remote.api_key is required when backend = \"remote\"".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Directory holding the per-owner task blobs
    pub fn tasks_dir(&self) -> PathBuf {
        self.data_dir.join("tasks")
    }

    /// Path of the persisted session file
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session")
    }
}
