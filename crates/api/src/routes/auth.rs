//! Authentication route handlers.
//!
//! Registration and sign-in return the user (never the password hash)
//! flattened together with a fresh bearer token.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};

use super::ApiJson;
use crate::error::Result;
use crate::middleware::{Elevated, RequireAuth, RequireRole, SuperUserOnly};
use crate::models::User;
use crate::services::auth::{AuthResponse, AuthService};
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Sign-in request body.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Response of the diagnostic `private` endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateResponse {
    pub ok: bool,
    pub message: &'static str,
    pub user: User,
    pub user_email: String,
    pub raw_headers: Vec<String>,
}

/// Response of the role-gated diagnostic endpoints.
#[derive(Debug, Serialize)]
pub struct RoleCheckResponse {
    pub ok: bool,
    pub user: User,
}

/// Register a new user.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let response = AuthService::new(state.pool(), state.tokens())
        .register(&body.email, &body.password, &body.full_name)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Sign in with email and password.
pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignInRequest>,
) -> Result<Json<AuthResponse>> {
    let response = AuthService::new(state.pool(), state.tokens())
        .sign_in(&body.email, &body.password)
        .await?;

    Ok(Json(response))
}

/// Any authenticated user; echoes the user and the request headers.
pub async fn private(RequireAuth(user): RequireAuth, headers: HeaderMap) -> Json<PrivateResponse> {
    let raw_headers = headers
        .iter()
        .flat_map(|(name, value)| {
            [
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            ]
        })
        .collect();

    Json(PrivateResponse {
        ok: true,
        message: "Hola Mundo Private",
        user_email: user.email.to_string(),
        user,
        raw_headers,
    })
}

/// `superUser` or `admin`.
pub async fn private2(RequireRole(user, _): RequireRole<Elevated>) -> Json<RoleCheckResponse> {
    Json(RoleCheckResponse { ok: true, user })
}

/// `superUser` only.
pub async fn private3(
    RequireRole(user, _): RequireRole<SuperUserOnly>,
) -> Json<RoleCheckResponse> {
    Json(RoleCheckResponse { ok: true, user })
}
