//! Authentication error types.

use thiserror::Error;

use super::token::TokenError;
use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] catalog_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("Credentials are not valid")]
    InvalidCredentials,

    /// Email already registered; carries the database's detail message.
    #[error("{0}")]
    UserAlreadyExists(String),

    /// Password does not meet the strength rules.
    #[error("{0}")]
    WeakPassword(String),

    /// Missing or malformed profile field.
    #[error("{0}")]
    InvalidProfile(String),

    /// Token could not be issued.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
