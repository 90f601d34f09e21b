//! HTTP-level integration tests for registration, login and RBAC.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

fn registration(username: &str, email: &str, password: &str, confirm: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "password": password,
        "confirm_password": confirm,
    })
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_creates_property_owner(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = registration("newowner", "owner@example.com", "long-enough", "long-enough");
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["username"], "newowner");
    assert_eq!(json["email"], "owner@example.com");
    assert_eq!(json["role"], "property_owner");
    assert!(json.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_password_mismatch(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = registration("newowner", "owner@example.com", "long-enough", "different");
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Passwords do not match.");
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_short_password(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = registration("newowner", "owner@example.com", "short", "short");
    let response = post_json(app, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_username_and_email(pool: PgPool) {
    common::create_user(&pool, "taken", "property_owner").await;

    let app = common::build_test_app(pool.clone());
    let body = registration("taken", "fresh@example.com", "long-enough", "long-enough");
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Username already taken.");

    let app = common::build_test_app(pool);
    let body = registration("fresh", "taken@test.com", "long-enough", "long-enough");
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Email already in use.");
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_then_login(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = registration("jane", "jane@example.com", "long-enough", "long-enough");
    assert_eq!(
        post_json(app, "/api/v1/auth/register", body).await.status(),
        StatusCode::CREATED
    );

    let app = common::build_test_app(pool.clone());
    let body = json!({ "username": "jane", "password": "long-enough" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["token_type"], "Bearer");
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["role"], "property_owner");

    // The issued token opens authenticated routes.
    let token = json["access_token"].as_str().unwrap();
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/accommodations", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    common::create_user(&pool, "wrongpw", "property_owner").await;
    let app = common::build_test_app(pool);

    let body = json!({ "username": "wrongpw", "password": "incorrect_password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_inactive_user(pool: PgPool) {
    let user = common::create_user(&pool, "inactive", "property_owner").await;
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let body = json!({ "username": "inactive", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// RBAC
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_and_invalid_tokens_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/accommodations").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/accommodations", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_property_owner_cannot_write_locations(pool: PgPool) {
    let owner = common::create_user(&pool, "owner", "property_owner").await;
    let token = common::token_for(&owner);
    let app = common::build_test_app(pool);

    let body = json!({
        "id": "usa", "title": "USA", "location_type": "country",
        "latitude": 38.0, "longitude": -97.0, "country_code": "US",
    });
    let response = post_json_auth(app, "/api/v1/locations", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
