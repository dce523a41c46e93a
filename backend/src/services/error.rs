//! Errors raised by the scheduling and workflow services.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::{ConducteurStatus, ValidationErrors};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// User-correctable input. Nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The actor may not perform this action. Nothing was written.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Cannot {action} a run-sheet that is {from}")]
    InvalidTransition {
        from: ConducteurStatus,
        action: &'static str,
    },

    #[error("{0}")]
    NotFound(String),

    /// A store call failed. Earlier writes of the same operation stand.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl ServiceError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// `what` names the entity, e.g. `Conducteur 4`.
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} not found", what))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { message, .. } => Self::NotFound(message),
            other => Self::Repository(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err: ServiceError = RepositoryError::not_found("Program 4 not found").into();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Program 4 not found"));
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = ServiceError::InvalidTransition {
            from: ConducteurStatus::Validated,
            action: "reject",
        };
        assert_eq!(err.to_string(), "Cannot reject a run-sheet that is validated");
    }
}
