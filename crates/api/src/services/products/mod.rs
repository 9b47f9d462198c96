//! Product service.
//!
//! Validates input, applies slug and default rules and classifies
//! repository failures: unique violations become client errors, anything
//! else is logged and reported as an opaque internal error.

mod error;

pub use error::ProductError;

use sqlx::PgPool;
use tracing::instrument;

use catalog_core::{LookupTerm, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::{CreateProductInput, Pagination, Product, ProductDraft, ProductPatch, User};

/// Product service.
pub struct ProductService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Create a product owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::InvalidInput` for invalid fields,
    /// `ProductError::Duplicate` if the title or slug is taken.
    #[instrument(skip(self, input, owner), fields(title = %input.title, owner = %owner.id))]
    pub async fn create(
        &self,
        input: &CreateProductInput,
        owner: &User,
    ) -> Result<Product, ProductError> {
        input.validate().map_err(ProductError::InvalidInput)?;
        let draft = ProductDraft::from_input(input);

        self.products
            .create(&draft, &input.images, owner.id)
            .await
            .map_err(classify)
    }

    /// List products, `limit` per page starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::InvalidInput` if the page bounds are invalid.
    #[instrument(skip(self))]
    pub async fn list(&self, page: Pagination) -> Result<Vec<Product>, ProductError> {
        let (limit, offset) = page.resolve().map_err(ProductError::InvalidInput)?;
        self.products.list(limit, offset).await.map_err(classify)
    }

    /// Find a product by id, or by title/slug when `term` is not a UUID.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` naming the term if nothing matches.
    #[instrument(skip(self))]
    pub async fn find_one(&self, term: &str) -> Result<Product, ProductError> {
        let found = match LookupTerm::parse(term) {
            LookupTerm::Id(id) => self.products.get_by_id(id).await,
            LookupTerm::Text { raw, slug } => {
                self.products.find_by_title_or_slug(&raw, &slug).await
            }
        }
        .map_err(classify)?;

        found.ok_or_else(|| ProductError::NotFound(term.to_owned()))
    }

    /// Apply a partial update and make `owner` the product's owner.
    ///
    /// Existence is checked before the transaction opens; a supplied image
    /// list replaces the stored one, an absent one leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the product does not exist.
    /// Returns `ProductError::Duplicate` if the new title or slug is taken.
    #[instrument(skip(self, patch, owner), fields(owner = %owner.id))]
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
        owner: &User,
    ) -> Result<Product, ProductError> {
        patch.validate().map_err(ProductError::InvalidInput)?;

        let existing = self
            .products
            .get_by_id(id)
            .await
            .map_err(classify)?
            .ok_or_else(|| not_found_id(id))?;

        let draft = ProductDraft::merge(&existing, patch);

        self.products
            .update(id, &draft, patch.image_update(), owner.id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => not_found_id(id),
                other => classify(other),
            })
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no product was deleted.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: ProductId) -> Result<(), ProductError> {
        if self.products.delete(id).await.map_err(classify)? {
            Ok(())
        } else {
            Err(not_found_id(id))
        }
    }

    /// Delete every product, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Repository` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<u64, ProductError> {
        self.products.delete_all().await.map_err(classify)
    }
}

fn not_found_id(id: ProductId) -> ProductError {
    ProductError::NotFound(format!("id: {id}"))
}

/// Map a repository error onto the product error policy.
fn classify(err: RepositoryError) -> ProductError {
    match err {
        RepositoryError::Conflict(detail) => ProductError::Duplicate(detail),
        other => {
            tracing::error!(error = %other, "Product repository failure");
            ProductError::Repository(other)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_conflict_keeps_detail() {
        let err = classify(RepositoryError::Conflict(
            "Key (slug)=(kids_tee) already exists.".to_owned(),
        ));
        assert!(
            matches!(err, ProductError::Duplicate(ref d) if d == "Key (slug)=(kids_tee) already exists.")
        );
    }

    #[test]
    fn test_classify_other_is_opaque() {
        let err = classify(RepositoryError::DataCorruption("bad gender".to_owned()));
        assert!(matches!(err, ProductError::Repository(_)));
    }

    #[test]
    fn test_not_found_message_names_id() {
        let id = ProductId::generate();
        assert_eq!(
            not_found_id(id).to_string(),
            format!("Product with id: {id} not found")
        );
    }
}
