//! Persisted user settings: the API key and the service base URL.
//!
//! Settings live in a YAML file under the platform config directory
//! (`~/.config/hemolog/config.yml` on Linux). `HEMOLOG_API_KEY` and
//! `HEMOLOG_BASE_URL` override the file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use hemolog_core::{ApiKeyProvider, ConfigError, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_KEY_ENV: &str = "HEMOLOG_API_KEY";
pub const BASE_URL_ENV: &str = "HEMOLOG_BASE_URL";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("no configuration directory on this platform")]
    NoConfigDir,

    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join("hemolog").join("config.yml"))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_yaml::from_str(&content).map_err(|source| SettingsError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|source| SettingsError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        // The file holds the API key: owner-only on Unix.
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path).map_err(io_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }
        file.write_all(yaml.as_bytes()).map_err(io_err)
    }

    /// Apply environment overrides. Empty variables are ignored.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let set = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = set(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = set(BASE_URL_ENV) {
            self.base_url = url;
        }
        self
    }

    /// The key with all but its last four characters hidden. Keys of four
    /// characters or fewer are hidden entirely.
    pub fn masked_key(&self) -> String {
        match &self.api_key {
            None => "(not set)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                let hidden = if chars.len() <= 4 {
                    chars.len()
                } else {
                    chars.len() - 4
                };
                chars
                    .iter()
                    .enumerate()
                    .map(|(i, c)| if i < hidden { '*' } else { *c })
                    .collect()
            }
        }
    }
}

impl ApiKeyProvider for Settings {
    fn api_key(&self) -> Result<String, ConfigError> {
        self.api_key.clone().ok_or(ConfigError::MissingApiKey)
    }
}
