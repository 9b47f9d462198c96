//! Bearer-token authentication and role authorization extractors.
//!
//! Every protected route runs the same chain: [`authenticate`] turns the
//! `Authorization: Bearer` header into an active [`User`], then [`authorize`]
//! checks the user against the route's role set, then the handler runs.

use std::marker::PhantomData;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use catalog_core::Role;

use crate::db::UserRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::services::auth::TokenError;
use crate::state::AppState;

/// A set of roles, any one of which admits a user.
pub trait RoleSet: Send + Sync {
    /// The admitted roles. Empty admits every authenticated user.
    const ROLES: &'static [Role];
}

/// `admin` or `superUser`.
pub struct Elevated;

impl RoleSet for Elevated {
    const ROLES: &'static [Role] = &[Role::Admin, Role::SuperUser];
}

/// `admin` only.
pub struct AdminOnly;

impl RoleSet for AdminOnly {
    const ROLES: &'static [Role] = &[Role::Admin];
}

/// `superUser` only.
pub struct SuperUserOnly;

impl RoleSet for SuperUserOnly {
    const ROLES: &'static [Role] = &[Role::SuperUser];
}

/// Extractor that requires a valid token for an active user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.full_name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Extractor that requires a valid token and one of the roles in `R`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireRole(user, _): RequireRole<Elevated>) -> impl IntoResponse {
///     format!("Hello, {}!", user.full_name)
/// }
/// ```
pub struct RequireRole<R: RoleSet>(pub User, pub PhantomData<R>);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state).await.map(Self)
    }
}

impl<R: RoleSet> FromRequestParts<AppState> for RequireRole<R> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(&parts.headers, state).await?;
        authorize(&user, R::ROLES)?;
        Ok(Self(user, PhantomData))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if the header is missing or malformed.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_owned()))
}

/// Resolve the request's bearer token to an active user.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` for a missing, invalid or expired token,
/// an unknown user or an inactive user.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<User, AppError> {
    let token = bearer_token(headers)?;

    let claims = state.tokens().verify(token).map_err(|e| match e {
        TokenError::Expired => AppError::Unauthorized("Token expired".to_owned()),
        _ => AppError::Unauthorized("Token not valid".to_owned()),
    })?;

    let user = UserRepository::new(state.pool())
        .get_by_id(claims.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Token not valid".to_owned()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized(
            "User is inactive, talk with an admin".to_owned(),
        ));
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(user)
}

/// Check `user` against a role set. An empty set admits everyone.
///
/// # Errors
///
/// Returns `AppError::Forbidden` if the user holds none of `roles`.
pub fn authorize(user: &User, roles: &[Role]) -> Result<(), AppError> {
    if roles.is_empty() || user.has_any_role(roles) {
        return Ok(());
    }

    let wanted = roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Err(AppError::Forbidden(format!(
        "User {} need a valid role: [{wanted}]",
        user.full_name
    )))
}
