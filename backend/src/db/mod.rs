//! Storage layer for the program grid, run-sheets and notifications.
//!
//! This module provides abstractions for store operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer (http/) / domain services (services/)       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Read-side helpers (services.rs)                        │
//! │  - Weekly grid with live status                         │
//! │  - Notification inbox                                   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```
//! use radio_grid::db::{services, RepositoryFactory};
//! use radio_grid::models::TenantId;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let repo = RepositoryFactory::create_local();
//! let grid = services::weekly_grid(repo.as_ref(), &TenantId::new("dir-1")).await.unwrap();
//! assert_eq!(grid.program_count(), 0);
//! # });
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use services::{health_check, list_notifications, list_programs, unread_count, weekly_grid};

pub use repo_config::{RepositoryConfig, RepositorySettings};

// Repository traits and implementations
pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
pub use repository::{
    ConducteurRepository, ElementRepository, ErrorContext, FullRepository,
    NotificationRepository, ProgramRepository, RepositoryError, RepositoryResult,
};
