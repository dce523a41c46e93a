//! Repository configuration file support.
//!
//! This module reads the store configuration from a TOML file:
//!
//! ```toml
//! [repository]
//! type = "local"
//! seed_file = "fixtures/grid.json"   # optional
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "RADIO_CONFIG";

/// Repository configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
    /// JSON array of programs loaded into the in-memory store at startup
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
            seed_file: None,
        }
    }
}

fn default_repo_type() -> String {
    "local".to_string()
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let mut config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        // Relative seed paths are resolved against the config file's directory.
        if let (Some(seed), Some(dir)) = (&config.repository.seed_file, path.as_ref().parent()) {
            if seed.is_relative() {
                config.repository.seed_file = Some(dir.join(seed));
            }
        }

        Ok(config)
    }

    /// Load repository configuration from the default location.
    ///
    /// Uses `RADIO_CONFIG` when set, otherwise searches for `radio.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if found and parsed successfully
    /// * `Err(RepositoryError)` if no config file found or parse error
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(explicit);
        }

        let search_paths = [
            PathBuf::from("radio.toml"),
            PathBuf::from("backend/radio.toml"),
            PathBuf::from("../radio.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No radio.toml found in standard locations",
        ))
    }

    /// Like [`RepositoryConfig::from_default_location`], falling back to defaults
    /// when no file exists. A file that exists but does not parse is still an error.
    pub fn load_or_default() -> Result<Self, RepositoryError> {
        match Self::from_default_location() {
            Ok(config) => Ok(config),
            Err(e) if e.to_string().contains("No radio.toml found") => {
                log::info!("No radio.toml found, using default repository settings");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }
}
