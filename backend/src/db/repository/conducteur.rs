//! Run-sheet store (headers only; segments live in the element store).

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Conducteur, ConducteurId, ConducteurStatus, TenantId, UserId};

/// Repository trait for run-sheet headers.
///
/// `elements` on values passed in are ignored; reads through
/// [`ConducteurRepository::get_with_elements`] attach them.
#[async_trait]
pub trait ConducteurRepository: Send + Sync {
    /// Store a new run-sheet header and return its id.
    async fn create_conducteur(&self, conducteur: &Conducteur) -> RepositoryResult<ConducteurId>;

    /// Overwrite a run-sheet header. No version check is made.
    async fn update_conducteur(&self, conducteur: &Conducteur) -> RepositoryResult<()>;

    /// Delete a run-sheet and its segments.
    async fn delete_conducteur(&self, id: ConducteurId) -> RepositoryResult<()>;

    /// Load a run-sheet with its segments sorted by `order`.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the run-sheet doesn't exist
    async fn get_with_elements(&self, id: ConducteurId) -> RepositoryResult<Conducteur>;

    /// Every run-sheet of a station, newest first.
    async fn list_conducteurs(&self, tenant: &TenantId) -> RepositoryResult<Vec<Conducteur>>;

    /// Run-sheets of a station in one status, newest first.
    async fn list_by_status(
        &self,
        tenant: &TenantId,
        status: ConducteurStatus,
    ) -> RepositoryResult<Vec<Conducteur>>;

    /// Run-sheets authored by one host, newest first.
    async fn list_by_host(&self, host: &UserId) -> RepositoryResult<Vec<Conducteur>>;

    /// Set status and rejection comment only.
    async fn update_status(
        &self,
        id: ConducteurId,
        status: ConducteurStatus,
        rejection_comment: Option<String>,
    ) -> RepositoryResult<()>;
}
