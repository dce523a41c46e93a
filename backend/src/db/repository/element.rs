//! Run-sheet segment store.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{ConducteurElement, ConducteurId, ElementId};

#[async_trait]
pub trait ElementRepository: Send + Sync {
    /// Store a segment under a run-sheet and return its id.
    async fn create_element(
        &self,
        conducteur_id: ConducteurId,
        element: &ConducteurElement,
    ) -> RepositoryResult<ElementId>;

    /// Overwrite a segment; `element.id` must be set.
    async fn update_element(&self, element: &ConducteurElement) -> RepositoryResult<()>;

    async fn delete_element(&self, id: ElementId) -> RepositoryResult<()>;

    /// Segments of a run-sheet sorted by `order`.
    async fn list_elements(&self, conducteur_id: ConducteurId)
        -> RepositoryResult<Vec<ConducteurElement>>;
}
