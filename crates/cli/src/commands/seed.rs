//! Seed the catalog with the fixture products.

use thiserror::Error;

use catalog_api::db::{RepositoryError, UserRepository};
use catalog_api::services::seed::{SeedError, run_seed};
use catalog_core::{Email, EmailError, Role};

use super::{CommandError, connect};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedCommandError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("No user with email: {0}")]
    UserNotFound(String),

    #[error("User {0} is not an admin")]
    NotAdmin(String),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Seed(#[from] SeedError),
}

/// Replace all products with the fixture set, owned by `admin_email`.
///
/// # Errors
///
/// Returns `SeedCommandError` if the user is missing or not an admin, or if
/// the seed fails.
pub async fn run(admin_email: &str) -> Result<(), SeedCommandError> {
    let email = Email::parse(admin_email)?;
    let pool = connect().await?;

    let admin = UserRepository::new(&pool)
        .get_by_email(&email)
        .await?
        .ok_or_else(|| SeedCommandError::UserNotFound(email.to_string()))?;

    if !admin.has_any_role(&[Role::Admin]) {
        return Err(SeedCommandError::NotAdmin(email.to_string()));
    }

    let ack = run_seed(&pool, &admin).await?;
    tracing::info!("{ack}");
    Ok(())
}
