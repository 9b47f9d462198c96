//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; the body is always
//! `{"statusCode": .., "error": .., "message": ..}`.

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::files::FileError;
use crate::services::products::ProductError;
use crate::services::seed::SeedError;

/// Message sent in place of any server-side error detail.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level error type for the catalog API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Product operation failed.
    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    /// File upload or lookup failed.
    #[error("File error: {0}")]
    File(#[from] FileError),

    /// Seeding failed.
    #[error("Seed error: {0}")]
    Seed(#[from] SeedError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User lacks a required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    status_code: u16,
    error: &'a str,
    message: String,
}

impl AppError {
    /// Status code and client-facing message. `None` marks a server error
    /// whose detail must not leave the process.
    fn classify(&self) -> (StatusCode, Option<String>) {
        match self {
            Self::Database(_) | Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, Some(err.to_string()))
                }
                AuthError::InvalidEmail(_)
                | AuthError::UserAlreadyExists(_)
                | AuthError::WeakPassword(_)
                | AuthError::InvalidProfile(_) => (StatusCode::BAD_REQUEST, Some(err.to_string())),
                AuthError::Token(_) | AuthError::Repository(_) | AuthError::PasswordHash => {
                    (StatusCode::INTERNAL_SERVER_ERROR, None)
                }
            },
            Self::Product(err) | Self::Seed(SeedError::Product(err)) => classify_product(err),
            Self::Seed(SeedError::Fixtures(_)) => (StatusCode::INTERNAL_SERVER_ERROR, None),
            Self::File(err) => match err {
                FileError::NotAnImage | FileError::NotFound(_) => {
                    (StatusCode::BAD_REQUEST, Some(err.to_string()))
                }
                FileError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
            },
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, Some(msg.clone())),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, Some(msg.clone())),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, Some(msg.clone())),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, Some(msg.clone())),
        }
    }
}

fn classify_product(err: &ProductError) -> (StatusCode, Option<String>) {
    match err {
        ProductError::NotFound(_) => (StatusCode::NOT_FOUND, Some(err.to_string())),
        ProductError::Duplicate(_) | ProductError::InvalidInput(_) => {
            (StatusCode::BAD_REQUEST, Some(err.to_string()))
        }
        ProductError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();

        // Capture server errors to Sentry
        let message = message.unwrap_or_else(|| {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
            INTERNAL_MESSAGE.to_owned()
        });

        let body = ErrorBody {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error"),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(err.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
