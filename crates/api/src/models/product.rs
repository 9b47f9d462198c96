//! Product domain types and the request payloads that build them.

use serde::{Deserialize, Serialize};

use catalog_core::{Email, Gender, Price, ProductId, Slug, UserId};

/// Default page size for product listings.
pub const DEFAULT_LIMIT: i64 = 10;

/// A catalog product with its image URLs flattened in stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub description: Option<String>,
    pub slug: Slug,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: Gender,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    /// The user who last created or updated the product.
    pub user: Option<ProductOwner>,
}

/// Public projection of a product's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOwner {
    pub id: UserId,
    pub email: Email,
    pub full_name: String,
}

/// Body of `POST /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub title: String,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    pub sizes: Vec<String>,
    pub gender: Gender,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateProductInput {
    /// Check field constraints that the type system does not cover.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        validate_title(&self.title)?;
        validate_stock(self.stock)
    }
}

/// Body of `PATCH /products/{id}`. Every field is optional.
///
/// `images` distinguishes an absent key (`None`, keep the current images)
/// from a supplied list (`Some`, replace them all, even with an empty list).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub sizes: Option<Vec<String>>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

impl ProductPatch {
    /// Check field constraints on the supplied fields.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_stock(self.stock)
    }

    /// What the update does to the product's image rows.
    #[must_use]
    pub fn image_update(&self) -> ImageUpdate<'_> {
        self.images
            .as_deref()
            .map_or(ImageUpdate::Keep, ImageUpdate::Replace)
    }
}

/// Image handling for a product update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageUpdate<'a> {
    /// Leave the stored images untouched.
    Keep,
    /// Delete every stored image and insert these, in order.
    Replace(&'a [String]),
}

/// Scalar columns of a product row, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub title: String,
    pub price: Price,
    pub description: Option<String>,
    pub slug: Slug,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: Gender,
    pub tags: Vec<String>,
}

impl ProductDraft {
    /// Build the row for a new product, applying defaults and slug derivation.
    #[must_use]
    pub fn from_input(input: &CreateProductInput) -> Self {
        let title = input.title.trim().to_owned();
        Self {
            slug: Slug::derive(&title, input.slug.as_deref()),
            title,
            price: input.price.unwrap_or(Price::ZERO),
            description: input.description.clone(),
            stock: input.stock.unwrap_or(0),
            sizes: input.sizes.clone(),
            gender: input.gender,
            tags: input.tags.clone(),
        }
    }

    /// Overlay a patch onto an existing product.
    ///
    /// A supplied slug is normalized; the slug is not re-derived when only
    /// the title changes.
    #[must_use]
    pub fn merge(existing: &Product, patch: &ProductPatch) -> Self {
        Self {
            title: patch
                .title
                .as_deref()
                .map_or_else(|| existing.title.clone(), |t| t.trim().to_owned()),
            price: patch.price.unwrap_or(existing.price),
            description: patch
                .description
                .clone()
                .or_else(|| existing.description.clone()),
            slug: patch
                .slug
                .as_deref()
                .map_or_else(|| existing.slug.clone(), Slug::normalize),
            stock: patch.stock.unwrap_or(existing.stock),
            sizes: patch.sizes.clone().unwrap_or_else(|| existing.sizes.clone()),
            gender: patch.gender.unwrap_or(existing.gender),
            tags: patch.tags.clone().unwrap_or_else(|| existing.tags.clone()),
        }
    }
}

/// Query string of `GET /products`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// Resolve to `(limit, offset)`, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns a message if `limit < 1` or `offset < 0`.
    pub fn resolve(self) -> Result<(i64, i64), String> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = self.offset.unwrap_or(0);
        if limit < 1 {
            return Err("limit must be a positive number".to_owned());
        }
        if offset < 0 {
            return Err("offset must not be negative".to_owned());
        }
        Ok((limit, offset))
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title should not be empty".to_owned());
    }
    Ok(())
}

fn validate_stock(stock: Option<i32>) -> Result<(), String> {
    match stock {
        Some(stock) if stock < 0 => Err("stock must not be negative".to_owned()),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn shirt() -> Product {
        Product {
            id: ProductId::generate(),
            title: "Men's Chill Crew Neck".to_owned(),
            price: Price::new(Decimal::new(75, 0)).unwrap(),
            description: Some("Cotton".to_owned()),
            slug: Slug::normalize("Men's Chill Crew Neck"),
            stock: 7,
            sizes: vec!["S".to_owned(), "M".to_owned()],
            gender: Gender::Men,
            tags: vec!["sweatshirt".to_owned()],
            images: vec!["a.jpg".to_owned(), "b.jpg".to_owned()],
            user: None,
        }
    }

    #[test]
    fn test_create_input_defaults() {
        let input: CreateProductInput = serde_json::from_str(
            r#"{"title":" Kids Tee ","sizes":["XS"],"gender":"kid"}"#,
        )
        .unwrap();
        let draft = ProductDraft::from_input(&input);
        assert_eq!(draft.title, "Kids Tee");
        assert_eq!(draft.slug.as_str(), "kids_tee");
        assert_eq!(draft.price, Price::ZERO);
        assert_eq!(draft.stock, 0);
        assert!(draft.tags.is_empty());
        assert!(input.images.is_empty());
    }

    #[test]
    fn test_create_input_explicit_slug_is_normalized() {
        let input: CreateProductInput = serde_json::from_str(
            r#"{"title":"Kids Tee","slug":"Kid's Best Tee","sizes":[],"gender":"kid"}"#,
        )
        .unwrap();
        assert_eq!(ProductDraft::from_input(&input).slug.as_str(), "kids_best_tee");
    }

    #[test]
    fn test_create_input_validation() {
        let mut input: CreateProductInput =
            serde_json::from_str(r#"{"title":"  ","sizes":[],"gender":"men"}"#).unwrap();
        assert!(input.validate().is_err());
        input.title = "Tee".to_owned();
        input.stock = Some(-1);
        assert!(input.validate().is_err());
        input.stock = Some(0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_input_rejects_unknown_gender() {
        assert!(
            serde_json::from_str::<CreateProductInput>(
                r#"{"title":"Tee","sizes":[],"gender":"robot"}"#
            )
            .is_err()
        );
    }

    #[test]
    fn test_price_outside_column_is_rejected() {
        for price in ["1.999", "12345678901.5"] {
            let body = format!(r#"{{"title":"Tee","price":{price},"sizes":[],"gender":"men"}}"#);
            assert!(serde_json::from_str::<CreateProductInput>(&body).is_err());

            let patch = format!(r#"{{"price":{price}}}"#);
            assert!(serde_json::from_str::<ProductPatch>(&patch).is_err());
        }
    }

    #[test]
    fn test_patch_image_update() {
        let absent: ProductPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.image_update(), ImageUpdate::Keep);

        let empty: ProductPatch = serde_json::from_str(r#"{"images":[]}"#).unwrap();
        assert_eq!(empty.image_update(), ImageUpdate::Replace(&[]));

        let some: ProductPatch = serde_json::from_str(r#"{"images":["c.jpg"]}"#).unwrap();
        assert_eq!(
            some.image_update(),
            ImageUpdate::Replace(&["c.jpg".to_owned()])
        );
    }

    #[test]
    fn test_merge_empty_patch_keeps_everything() {
        let existing = shirt();
        let draft = ProductDraft::merge(&existing, &ProductPatch::default());
        assert_eq!(draft.title, existing.title);
        assert_eq!(draft.slug, existing.slug);
        assert_eq!(draft.price, existing.price);
        assert_eq!(draft.sizes, existing.sizes);
        assert_eq!(draft.description, existing.description);
    }

    #[test]
    fn test_merge_normalizes_supplied_slug_only() {
        let existing = shirt();
        let patch: ProductPatch =
            serde_json::from_str(r#"{"title":"New Title","stock":3}"#).unwrap();
        let draft = ProductDraft::merge(&existing, &patch);
        assert_eq!(draft.title, "New Title");
        assert_eq!(draft.slug, existing.slug);
        assert_eq!(draft.stock, 3);

        let patch: ProductPatch = serde_json::from_str(r#"{"slug":"Brand New Slug"}"#).unwrap();
        assert_eq!(
            ProductDraft::merge(&existing, &patch).slug.as_str(),
            "brand_new_slug"
        );
    }

    #[test]
    fn test_pagination_defaults_and_bounds() {
        assert_eq!(Pagination::default().resolve().unwrap(), (10, 0));
        let page = Pagination {
            limit: Some(2),
            offset: Some(4),
        };
        assert_eq!(page.resolve().unwrap(), (2, 4));
        assert!(
            Pagination {
                limit: Some(0),
                offset: None
            }
            .resolve()
            .is_err()
        );
        assert!(
            Pagination {
                limit: None,
                offset: Some(-1)
            }
            .resolve()
            .is_err()
        );
    }

    #[test]
    fn test_product_serializes_flat_images() {
        let json = serde_json::to_value(shirt()).unwrap();
        assert_eq!(json["images"], serde_json::json!(["a.jpg", "b.jpg"]));
        assert_eq!(json["slug"], "mens_chill_crew_neck");
        assert_eq!(json["gender"], "men");
        assert_eq!(json["price"], 75.0);
    }
}
