//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("local", "memory")
    ///
    /// # Returns
    /// * `Ok(RepositoryType)` if valid
    /// * `Err` if invalid
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from the `REPOSITORY_TYPE` environment variable.
    ///
    /// Returns `None` when the variable is unset.
    pub fn from_env() -> Option<Result<Self, String>> {
        std::env::var("REPOSITORY_TYPE").ok().map(|v| v.parse())
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use radio_grid::db::RepositoryFactory;
///
/// let repo = RepositoryFactory::create_local();
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `seed_file` - Optional JSON file of programs to preload
    pub async fn create(
        repo_type: RepositoryType,
        seed_file: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => match seed_file {
                Some(path) => {
                    let repo = LocalRepository::from_seed_file(path)?;
                    log::info!(
                        "Seeded local repository with {} programs from {}",
                        repo.program_count(),
                        path.display()
                    );
                    Ok(Arc::new(repo))
                }
                None => Ok(Self::create_local()),
            },
        }
    }

    /// Create an empty in-memory local repository.
    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from a TOML configuration file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the radio.toml configuration file
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new()
            .from_config_file(config_path)?
            .from_env()?
            .build()
            .await
    }

    /// Create repository from a RepositoryConfig instance.
    ///
    /// `REPOSITORY_TYPE` in the environment overrides the configured type.
    pub async fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new()
            .from_config(config)?
            .from_env()?
            .build()
            .await
    }
}

/// Builder for configuring repository creation.
///
/// # Example
/// ```
/// use radio_grid::db::{ProgramRepository, RepositoryBuilder, RepositoryType};
///
/// # tokio_test_block(async {
/// let repo = RepositoryBuilder::new()
///     .repository_type(RepositoryType::Local)
///     .build()
///     .await
///     .unwrap();
/// assert!(repo.health_check().await.unwrap());
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    seed_file: Option<PathBuf>,
}

impl RepositoryBuilder {
    /// Create a new repository builder defaulting to an empty local store.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::Local,
            seed_file: None,
        }
    }

    /// Set the repository type.
    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    /// Preload programs from a JSON file.
    pub fn seed_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.seed_file = Some(path.into());
        self
    }

    /// Apply the `REPOSITORY_TYPE` environment override, if set.
    pub fn from_env(mut self) -> Result<Self, RepositoryError> {
        if let Some(parsed) = RepositoryType::from_env() {
            self.repo_type = parsed.map_err(|e| {
                RepositoryError::configuration(format!("Invalid REPOSITORY_TYPE: {}", e))
            })?;
        }
        Ok(self)
    }

    /// Apply settings from a loaded configuration.
    pub fn from_config(mut self, config: &RepositoryConfig) -> Result<Self, RepositoryError> {
        self.repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        self.seed_file = config.repository.seed_file.clone();
        Ok(self)
    }

    /// Load configuration from a TOML file.
    pub fn from_config_file<P: AsRef<Path>>(self, config_path: P) -> Result<Self, RepositoryError> {
        let config = RepositoryConfig::from_file(config_path)?;
        self.from_config(&config)
    }

    /// Build the repository instance.
    pub async fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryFactory::create(self.repo_type, self.seed_file.as_deref()).await
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
