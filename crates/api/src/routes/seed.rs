//! Seed route handler.

use axum::extract::State;

use crate::error::Result;
use crate::middleware::{AdminOnly, RequireRole};
use crate::services::seed;
use crate::state::AppState;

/// Replace all products with the fixture set, owned by the calling admin.
pub async fn run(
    State(state): State<AppState>,
    RequireRole(user, _): RequireRole<AdminOnly>,
) -> Result<&'static str> {
    Ok(seed::run_seed(state.pool(), &user).await?)
}
