//! Product CRUD, lookup and pagination against a live database.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use reqwest::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

use catalog_core::Role;
use catalog_integration_tests::{TestApp, product};

async fn created(app: &TestApp, token: &str, body: &Value) -> Value {
    let response = app.create_product(token, body).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn create_derives_slug_and_attaches_owner(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (admin, token) = app.admin().await.unwrap();

    let body = created(&app, &token, &product("Men's Chill Crew", &["a.jpg", "b.jpg"])).await;

    assert_eq!(body["slug"], "mens_chill_crew");
    assert_eq!(body["images"], json!(["a.jpg", "b.jpg"]));
    assert_eq!(body["user"]["id"], admin.id.to_string());
    assert!(body["user"].get("password").is_none());
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn create_requires_elevated_role(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app
        .user_with_roles("ana@shop.test", &[Role::User])
        .await
        .unwrap();

    let response = app.create_product(&token, &product("Tee", &[])).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.product_count().await.unwrap(), 0);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn find_by_id_title_or_slug_returns_same_product(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();
    let body = created(&app, &token, &product("Chill Crew Neck", &["front.jpg", "back.jpg"])).await;
    let id = body["id"].as_str().unwrap();

    for term in [id, "chill crew neck", "CHILL CREW NECK", "chill_crew_neck"] {
        let path = format!("/products/{}", term.replace(' ', "%20"));
        let (status, found) = app.get_json(&path).await.unwrap();
        assert_eq!(status, StatusCode::OK, "term {term}");
        assert_eq!(found["id"], id);
        assert_eq!(found["images"], json!(["front.jpg", "back.jpg"]));
    }

    let (status, body) = app.get_json("/products/no_such_thing").await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product with no_such_thing not found");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn update_with_images_replaces_them(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();
    let body = created(&app, &token, &product("Tee", &["a.jpg", "b.jpg"])).await;
    let id = body["id"].as_str().unwrap();

    let response = app
        .update_product(&token, id, &json!({"images": ["c.jpg"], "stock": 9}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["images"], json!(["c.jpg"]));
    assert_eq!(updated["stock"], 9);

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog.product_images")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(stored, 1);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn update_without_images_keeps_them(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();
    let body = created(&app, &token, &product("Tee", &["a.jpg", "b.jpg"])).await;
    let id = body["id"].as_str().unwrap();

    let response = app.update_product(&token, id, &json!({})).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["images"], json!(["a.jpg", "b.jpg"]));
    assert_eq!(updated["title"], "Tee");
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn update_of_missing_product_changes_nothing(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();
    created(&app, &token, &product("Tee", &["a.jpg"])).await;
    let missing = uuid::Uuid::new_v4().to_string();

    let response = app
        .update_product(&token, &missing, &json!({"images": ["x.jpg"]}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(app.product_count().await.unwrap(), 1);
    let images: Vec<String> = sqlx::query_scalar("SELECT url FROM catalog.product_images")
        .fetch_all(&app.pool)
        .await
        .unwrap();
    assert_eq!(images, vec!["a.jpg".to_owned()]);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn update_rejects_non_uuid_id(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();

    let response = app.update_product(&token, "tee", &json!({})).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn concurrent_duplicate_titles_admit_one(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();
    let body = product("Limited Tee", &[]);

    let (first, second) = tokio::join!(
        app.create_product(&token, &body),
        app.create_product(&token, &body)
    );
    let mut statuses = vec![first.unwrap().status(), second.unwrap().status()];
    statuses.sort();

    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    assert_eq!(app.product_count().await.unwrap(), 1);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn pages_are_disjoint_and_exhaustive(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();
    for n in 0..7 {
        created(&app, &token, &product(&format!("Tee {n}"), &[])).await;
    }

    let mut seen = HashSet::new();
    for offset in [0, 3, 6] {
        let (status, page) = app
            .get_json(&format!("/products?limit=3&offset={offset}"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        for item in page.as_array().unwrap() {
            assert!(seen.insert(item["id"].as_str().unwrap().to_owned()));
        }
    }
    assert_eq!(seen.len(), 7);

    let (_, default_page) = app.get_json("/products").await.unwrap();
    assert_eq!(default_page.as_array().unwrap().len(), 7);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn delete_removes_product_and_images(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();
    let body = created(&app, &token, &product("Tee", &["a.jpg"])).await;
    let id = body["id"].as_str().unwrap();

    let delete = |id: String| {
        let request = app
            .client
            .delete(app.url(&format!("/products/{id}")))
            .bearer_auth(&token);
        async move { request.send().await.unwrap().status() }
    };

    assert_eq!(delete(id.to_owned()).await, StatusCode::OK);
    assert_eq!(delete(id.to_owned()).await, StatusCode::NOT_FOUND);

    let (status, _) = app.get_json(&format!("/products/{id}")).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    let images: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog.product_images")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(images, 0);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn create_rejects_prices_the_column_cannot_hold(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();

    for price in [json!(12_345_678_901.5), json!(1.999)] {
        let mut body = product("Tee", &[]);
        body["price"] = price.clone();

        let response = app.create_product(&token, &body).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "price {price}");
    }
    assert_eq!(app.product_count().await.unwrap(), 0);

    let mut body = product("Tee", &[]);
    body["price"] = json!(19.99);
    let tee = created(&app, &token, &body).await;
    assert_eq!(tee["price"], 19.99);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn update_with_empty_images_clears_them(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();
    let body = created(&app, &token, &product("Tee", &["a.jpg", "b.jpg"])).await;
    let id = body["id"].as_str().unwrap();

    let response = app
        .update_product(&token, id, &json!({"images": []}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["images"], json!([]));

    let (_, found) = app.get_json(&format!("/products/{id}")).await.unwrap();
    assert_eq!(found["images"], json!([]));
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog.product_images")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[sqlx::test(migrations = "../api/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn conflicting_update_rolls_back_images(pool: PgPool) {
    let app = TestApp::spawn(pool).await.unwrap();
    let (_, token) = app.admin().await.unwrap();
    let alpha = created(&app, &token, &product("Alpha", &["a.jpg"])).await;
    created(&app, &token, &product("Beta", &["b.jpg"])).await;
    let id = alpha["id"].as_str().unwrap();

    let response = app
        .update_product(&token, id, &json!({"title": "Beta", "images": ["z.jpg"]}))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Key (title)=(Beta) already exists.");

    let (status, found) = app.get_json(&format!("/products/{id}")).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["title"], "Alpha");
    assert_eq!(found["images"], json!(["a.jpg"]));
}
