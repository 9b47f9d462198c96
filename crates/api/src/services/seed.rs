//! Development data seeder.
//!
//! Replaces the whole catalog with a fixed fixture set, owned by the admin
//! running the seed. Inserts run concurrently with no ordering and no
//! rollback across the batch: products created before a failure stay.

use futures::future::join_all;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use super::products::{ProductError, ProductService};
use crate::models::{CreateProductInput, User};

/// Acknowledgement returned by a successful seed.
pub const SEED_EXECUTED: &str = "SEED EXECUTED";

const FIXTURES: &str = include_str!("../../seed/products.json");

/// Errors from running the seed.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The compiled-in fixture document is malformed.
    #[error("invalid seed fixtures: {0}")]
    Fixtures(#[from] serde_json::Error),

    /// Clearing or inserting products failed.
    #[error("seed failed: {0}")]
    Product(#[from] ProductError),
}

/// Parse the fixture products.
///
/// # Errors
///
/// Returns `SeedError::Fixtures` if the fixture document does not parse.
pub fn fixtures() -> Result<Vec<CreateProductInput>, SeedError> {
    Ok(serde_json::from_str(FIXTURES)?)
}

/// Delete every product and insert the fixtures as `admin`.
///
/// # Errors
///
/// Returns the first failure; other inserts in the batch are not undone.
#[instrument(skip(pool, admin), fields(admin = %admin.id))]
pub async fn run_seed(pool: &PgPool, admin: &User) -> Result<&'static str, SeedError> {
    let products = fixtures()?;
    let service = ProductService::new(pool);

    let deleted = service.delete_all().await?;
    tracing::info!(deleted, "Cleared products");

    let results = join_all(products.iter().map(|p| service.create(p, admin))).await;

    let mut first_error = None;
    let mut created = 0_usize;
    for result in results {
        match result {
            Ok(_) => created += 1,
            Err(e) => {
                tracing::warn!(error = %e, "Seed insert failed");
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e.into());
    }

    tracing::info!(created, "Seed executed");
    Ok(SEED_EXECUTED)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use catalog_core::Slug;

    use super::*;
    use crate::models::ProductDraft;

    #[test]
    fn test_fixtures_parse_and_validate() {
        let products = fixtures().unwrap();
        assert!(!products.is_empty());
        for product in &products {
            assert!(product.validate().is_ok(), "{}", product.title);
            assert!(!product.images.is_empty(), "{}", product.title);
        }
    }

    #[test]
    fn test_fixture_titles_and_slugs_are_unique() {
        let products = fixtures().unwrap();
        let titles: HashSet<_> = products.iter().map(|p| p.title.to_uppercase()).collect();
        let slugs: HashSet<Slug> = products
            .iter()
            .map(|p| ProductDraft::from_input(p).slug)
            .collect();
        assert_eq!(titles.len(), products.len());
        assert_eq!(slugs.len(), products.len());
    }
}
