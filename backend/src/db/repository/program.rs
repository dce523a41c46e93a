//! Program store: the weekly grid of each station.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Program, ProgramId, TenantId};

/// Repository trait for the tenant-scoped program collection.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Program Operations ====================

    /// List every program of a station.
    async fn list_programs(&self, tenant: &TenantId) -> RepositoryResult<Vec<Program>>;

    /// Get one program.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If it doesn't exist in this tenant
    async fn get_program(&self, id: ProgramId, tenant: &TenantId) -> RepositoryResult<Program>;

    /// Store a new program and return its assigned id.
    async fn create_program(&self, program: &Program, tenant: &TenantId)
        -> RepositoryResult<ProgramId>;

    /// Overwrite an existing program (last write wins).
    async fn update_program(&self, program: &Program, tenant: &TenantId) -> RepositoryResult<()>;

    /// Delete a program.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If it doesn't exist in this tenant
    async fn delete_program(&self, id: ProgramId, tenant: &TenantId) -> RepositoryResult<()>;
}
