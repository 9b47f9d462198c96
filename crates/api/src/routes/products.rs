//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use catalog_core::ProductId;

use super::{ApiJson, ApiQuery};
use crate::error::{AppError, Result};
use crate::middleware::{Elevated, RequireRole};
use crate::models::{CreateProductInput, Pagination, Product, ProductPatch};
use crate::services::products::ProductService;
use crate::state::AppState;

/// Create a product owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    RequireRole(user, _): RequireRole<Elevated>,
    ApiJson(input): ApiJson<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = ProductService::new(state.pool())
        .create(&input, &user)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// List products (`?limit=&offset=`).
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductService::new(state.pool()).list(page).await?;
    Ok(Json(products))
}

/// Get one product by id, title or slug.
pub async fn show(State(state): State<AppState>, Path(term): Path<String>) -> Result<Json<Product>> {
    let product = ProductService::new(state.pool()).find_one(&term).await?;
    Ok(Json(product))
}

/// Partially update a product; the caller becomes its owner.
pub async fn update(
    State(state): State<AppState>,
    RequireRole(user, _): RequireRole<Elevated>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let product = ProductService::new(state.pool())
        .update(id, &patch, &user)
        .await?;

    Ok(Json(product))
}

/// Delete a product.
pub async fn delete(
    State(state): State<AppState>,
    RequireRole(_, _): RequireRole<Elevated>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    ProductService::new(state.pool()).remove(id).await?;
    Ok(StatusCode::OK)
}

fn parse_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Validation failed (uuid is expected)".to_owned()))
}
