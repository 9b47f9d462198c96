//! Product service error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during product operations.
#[derive(Debug, Error)]
pub enum ProductError {
    /// No product matches the id or term.
    #[error("Product with {0} not found")]
    NotFound(String),

    /// Title or slug already taken; carries the database's detail message.
    #[error("{0}")]
    Duplicate(String),

    /// Request payload or query failed validation.
    #[error("{0}")]
    InvalidInput(String),

    /// Unexpected repository failure (already logged).
    #[error("database error: {0}")]
    Repository(#[source] RepositoryError),
}
