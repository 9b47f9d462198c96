//! Product repository for database operations.
//!
//! Image rows are an implementation detail: every read flattens them into the
//! product's ordered `images` list. Multi-statement writes run in a single
//! transaction and are rolled back explicitly before an error is returned.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use catalog_core::{Email, Gender, Price, ProductId, Slug, UserId};

use super::RepositoryError;
use crate::models::{ImageUpdate, Product, ProductDraft, ProductOwner};

const PRODUCT_SELECT: &str = r"
    SELECT p.id, p.title, p.price, p.description, p.slug, p.stock,
           p.sizes, p.gender, p.tags,
           p.user_id, u.email AS user_email, u.full_name AS user_full_name
    FROM catalog.products p
    LEFT JOIN catalog.users u ON u.id = p.user_id
";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    title: String,
    price: Decimal,
    description: Option<String>,
    slug: String,
    stock: i32,
    sizes: Vec<String>,
    gender: String,
    tags: Vec<String>,
    user_id: Option<Uuid>,
    user_email: Option<String>,
    user_full_name: Option<String>,
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    product_id: Uuid,
    url: String,
}

impl ProductRow {
    fn into_product(self, images: Vec<String>) -> Result<Product, RepositoryError> {
        let price = Price::new(self.price)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid price in database: {e}")))?;
        let gender = self.gender.parse::<Gender>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid gender in database: {e}"))
        })?;

        let user = match (self.user_id, self.user_email, self.user_full_name) {
            (Some(id), Some(email), Some(full_name)) => {
                let email = Email::parse(&email).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                })?;
                Some(ProductOwner {
                    id: UserId::new(id),
                    email,
                    full_name,
                })
            }
            _ => None,
        };

        Ok(Product {
            id: ProductId::new(self.id),
            title: self.title,
            price,
            description: self.description,
            slug: Slug::normalize(&self.slug),
            stock: self.stock,
            sizes: self.sizes,
            gender,
            tags: self.tags,
            images,
            user,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product and its images in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the title or slug is taken.
    /// Returns `RepositoryError::Database` for any other failure.
    pub async fn create(
        &self,
        draft: &ProductDraft,
        images: &[String],
        owner: UserId,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let result = insert_product(&mut tx, draft, images, owner).await;
        finish(tx, result).await
    }

    /// List products in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!("{PRODUCT_SELECT} ORDER BY p.created_at, p.id LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        let mut conn = self.pool.acquire().await?;
        attach_images(&mut conn, rows).await
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        load_product(&mut conn, id).await
    }

    /// Find a product whose title matches `raw` or `slug` (case-insensitively)
    /// or whose slug equals `slug`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn find_by_title_or_slug(
        &self,
        raw: &str,
        slug: &Slug,
    ) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "{PRODUCT_SELECT}
             WHERE UPPER(p.title) = UPPER($1) OR UPPER(p.title) = UPPER($2) OR p.slug = $2
             ORDER BY p.created_at, p.id
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(raw)
            .bind(slug.as_str())
            .fetch_optional(self.pool)
            .await?;

        let mut conn = self.pool.acquire().await?;
        Ok(attach_images(&mut conn, row.into_iter().collect())
            .await?
            .into_iter()
            .next())
    }

    /// Write `draft` over the product, reassign its owner and apply the image
    /// update, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the new title or slug is taken.
    /// Returns `RepositoryError::Database` for any other failure.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
        images: ImageUpdate<'_>,
        owner: UserId,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let result = update_product(&mut tx, id, draft, images, owner).await;
        finish(tx, result).await
    }

    /// Delete a product; its images cascade.
    ///
    /// Returns `true` if a product was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every product, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.products")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Commit on success, roll back on failure, then hand back the result.
async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    result: Result<T, RepositoryError>,
) -> Result<T, RepositoryError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Failed to roll back transaction");
            }
            Err(err)
        }
    }
}

async fn insert_product(
    conn: &mut PgConnection,
    draft: &ProductDraft,
    images: &[String],
    owner: UserId,
) -> Result<Product, RepositoryError> {
    let id: Uuid = sqlx::query_scalar(
        r"
        INSERT INTO catalog.products
            (title, price, description, slug, stock, sizes, gender, tags, user_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        ",
    )
    .bind(&draft.title)
    .bind(draft.price)
    .bind(&draft.description)
    .bind(draft.slug.as_str())
    .bind(draft.stock)
    .bind(&draft.sizes)
    .bind(draft.gender.as_str())
    .bind(&draft.tags)
    .bind(owner)
    .fetch_one(&mut *conn)
    .await
    .map_err(RepositoryError::from_write)?;

    let id = ProductId::new(id);
    insert_images(conn, id, images).await?;

    load_product(conn, id).await?.ok_or(RepositoryError::NotFound)
}

async fn update_product(
    conn: &mut PgConnection,
    id: ProductId,
    draft: &ProductDraft,
    images: ImageUpdate<'_>,
    owner: UserId,
) -> Result<Product, RepositoryError> {
    // Runs first so a product deleted since the caller's existence check is
    // reported as NotFound rather than as an image foreign-key failure.
    let result = sqlx::query(
        r"
        UPDATE catalog.products
        SET title = $2, price = $3, description = $4, slug = $5, stock = $6,
            sizes = $7, gender = $8, tags = $9, user_id = $10, updated_at = NOW()
        WHERE id = $1
        ",
    )
    .bind(id)
    .bind(&draft.title)
    .bind(draft.price)
    .bind(&draft.description)
    .bind(draft.slug.as_str())
    .bind(draft.stock)
    .bind(&draft.sizes)
    .bind(draft.gender.as_str())
    .bind(&draft.tags)
    .bind(owner)
    .execute(&mut *conn)
    .await
    .map_err(RepositoryError::from_write)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }

    if let ImageUpdate::Replace(urls) = images {
        sqlx::query("DELETE FROM catalog.product_images WHERE product_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        insert_images(conn, id, urls).await?;
    }

    load_product(conn, id).await?.ok_or(RepositoryError::NotFound)
}

async fn insert_images(
    conn: &mut PgConnection,
    product_id: ProductId,
    urls: &[String],
) -> Result<(), RepositoryError> {
    if urls.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r"
        INSERT INTO catalog.product_images (product_id, url, position)
        SELECT $1, t.url, (t.ord - 1)::INTEGER
        FROM UNNEST($2::TEXT[]) WITH ORDINALITY AS t(url, ord)
        ",
    )
    .bind(product_id)
    .bind(urls)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn load_product(
    conn: &mut PgConnection,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let sql = format!("{PRODUCT_SELECT} WHERE p.id = $1");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(attach_images(conn, row.into_iter().collect())
        .await?
        .into_iter()
        .next())
}

/// Fetch the images of all `rows` in one query and build the products.
async fn attach_images(
    conn: &mut PgConnection,
    rows: Vec<ProductRow>,
) -> Result<Vec<Product>, RepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let images = sqlx::query_as::<_, ImageRow>(
        r"
        SELECT product_id, url
        FROM catalog.product_images
        WHERE product_id = ANY($1)
        ORDER BY product_id, position, id
        ",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_product: HashMap<Uuid, Vec<String>> = HashMap::new();
    for image in images {
        by_product.entry(image.product_id).or_default().push(image.url);
    }

    rows.into_iter()
        .map(|row| {
            let images = by_product.remove(&row.id).unwrap_or_default();
            row.into_product(images)
        })
        .collect()
}
