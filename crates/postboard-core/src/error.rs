//! Domain-level error types.

use thiserror::Error;

use crate::validation::ValidationFailure;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Validation failed: {0}")]
    Validation(ValidationFailure),

    #[error(transparent)]
    Persistence(RepoError),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity_type, id } => DomainError::NotFound { entity_type, id },
            other => DomainError::Persistence(other),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: i32 },

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl RepoError {
    pub fn not_found(entity_type: &'static str, id: i32) -> Self {
        RepoError::NotFound { entity_type, id }
    }
}
