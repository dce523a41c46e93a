//! Repository trait definitions for the collaborator stores.
//!
//! Each trait mirrors one narrow store the core talks to. By splitting
//! responsibilities across traits, implementations stay focused and a test
//! double only needs the capabilities it exercises.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`program`]: The weekly grid (tenant-scoped programs)
//! - [`conducteur`]: Run-sheet headers and status
//! - [`element`]: Run-sheet segments
//! - [`notification`]: In-app notifications
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let programs = repo.list_programs(&tenant).await?;
//!     repo.create_notification(&notification).await?;
//!     Ok(())
//! }
//! ```

pub mod conducteur;
pub mod element;
pub mod error;
pub mod notification;
pub mod program;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use conducteur::ConducteurRepository;
pub use element::ElementRepository;
pub use notification::NotificationRepository;
pub use program::ProgramRepository;

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements
/// all four repository traits.
pub trait FullRepository:
    ProgramRepository + ConducteurRepository + ElementRepository + NotificationRepository
{
}

// Blanket implementation: any type implementing all four traits automatically implements FullRepository
impl<T> FullRepository for T where
    T: ProgramRepository + ConducteurRepository + ElementRepository + NotificationRepository
{
}
