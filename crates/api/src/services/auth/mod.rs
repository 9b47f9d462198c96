//! Authentication service.
//!
//! Registers users and signs them in with email and password, issuing a
//! signed session token on success.

mod error;
pub mod token;

pub use error::AuthError;
pub use token::{Claims, TokenError, TokenIssuer};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use catalog_core::{Email, Role};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::{NewUser, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length.
const MAX_PASSWORD_LENGTH: usize = 50;

/// A user together with a freshly issued token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenIssuer) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user with the default roles and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `AuthError::WeakPassword` or
    /// `AuthError::InvalidProfile` for invalid input.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<AuthResponse, AuthError> {
        let user = create_user(&self.users, email, password, full_name, Role::DEFAULT).await?;
        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(AuthResponse { user, token })
    }

    /// Sign in with email and password.
    ///
    /// Unknown email and wrong password produce the same error; the reason
    /// is only logged.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let Ok(email) = Email::parse(email) else {
            tracing::debug!("Sign-in with malformed email");
            return Err(AuthError::InvalidCredentials);
        };

        let Some((user, password_hash)) = self.users.get_password_hash(&email).await? else {
            tracing::debug!("Sign-in for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(e) = verify_password(password, &password_hash) {
            tracing::debug!(user_id = %user.id, "Sign-in with wrong password");
            return Err(e);
        }

        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse { user, token })
    }
}

/// Validate, hash and insert a user with explicit roles.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail`, `AuthError::WeakPassword` or
/// `AuthError::InvalidProfile` for invalid input.
/// Returns `AuthError::UserAlreadyExists` if the email is already registered.
#[instrument(skip(users, password))]
pub async fn create_user(
    users: &UserRepository<'_>,
    email: &str,
    password: &str,
    full_name: &str,
    roles: &[Role],
) -> Result<User, AuthError> {
    let email = Email::parse(email)?;
    validate_password(password)?;
    let full_name = validate_full_name(full_name)?;

    let password_hash = hash_password(password)?;

    let new_user = NewUser {
        email,
        password_hash,
        full_name,
        roles: roles.to_vec(),
    };

    users.create(&new_user).await.map_err(|e| match e {
        RepositoryError::Conflict(detail) => AuthError::UserAlreadyExists(detail),
        other => AuthError::Repository(other),
    })
}

/// Validate password strength.
///
/// 6 to 50 characters with an uppercase letter, a lowercase letter and a
/// digit or symbol.
fn validate_password(password: &str) -> Result<(), AuthError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_digit_or_symbol = password.chars().any(|c| !c.is_alphabetic());
    if !(has_upper && has_lower && has_digit_or_symbol) {
        return Err(AuthError::WeakPassword(
            "The password must have a Uppercase, lowercase letter and a number".to_owned(),
        ));
    }

    Ok(())
}

fn validate_full_name(full_name: &str) -> Result<String, AuthError> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(AuthError::InvalidProfile(
            "fullName should not be empty".to_owned(),
        ));
    }
    Ok(full_name.to_owned())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
