//! HTTP route handlers for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (database)
//!
//! # Auth
//! POST   /auth/register          - Register, returns user + token
//! POST   /auth/signin            - Sign in, returns user + token
//! GET    /auth/private           - Any authenticated user
//! GET    /auth/private2          - superUser or admin
//! GET    /auth/private3          - superUser
//!
//! # Products
//! POST   /products               - Create (admin, superUser)
//! GET    /products               - List (?limit=&offset=)
//! GET    /products/{term}        - Find by id, title or slug
//! PATCH  /products/{id}          - Update (admin, superUser)
//! DELETE /products/{id}          - Delete (admin, superUser)
//!
//! # Files
//! POST   /files/product          - Upload an image (multipart field `file`)
//! GET    /files/product/{name}   - Download an image
//!
//! # Seed
//! GET    /seed                   - Reset products to fixtures (admin)
//! ```

pub mod auth;
pub mod files;
pub mod products;
pub mod seed;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRequest, FromRequestParts, Query, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Largest accepted image upload.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// JSON body extractor whose rejections use the API error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections use the API error body.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/signin", post(auth::sign_in))
        .route("/private", get(auth::private))
        .route("/private2", get(auth::private2))
        .route("/private3", get(auth::private3))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{term}",
            get(products::show)
                .patch(products::update)
                .delete(products::delete),
        )
}

/// Create the file routes router.
pub fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/product",
            post(files::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/product/{name}", get(files::download))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/files", file_routes())
        .route("/seed", get(seed::run))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
