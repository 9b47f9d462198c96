//! Seeding against a live database.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use sqlx::PgPool;

use catalog_api::services::seed::{SEED_EXECUTED, fixtures};
use catalog_core::Role;
use catalog_integration_tests::{TestApp, product};

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn seed_replaces_catalog_with_fixtures(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (admin, token) = app.admin().await.unwrap();
    app.create_product(&token, &product("Leftover", &["old.jpg"]))
        .await
        .unwrap();

    let response = app
        .client
        .get(app.url("/seed"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), SEED_EXECUTED);

    let expected = i64::try_from(fixtures().unwrap().len()).unwrap();
    assert_eq!(app.product_count().await.unwrap(), expected);

    let leftover: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog.products WHERE title = 'Leftover'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(leftover, 0);

    let foreign: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog.products WHERE user_id <> $1")
        .bind(admin.id.as_uuid())
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(foreign, 0);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn seed_requires_admin(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app
        .user_with_roles("root@shop.test", &[Role::SuperUser])
        .await
        .unwrap();

    let response = app
        .client
        .get(app.url("/seed"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.product_count().await.unwrap(), 0);
}
