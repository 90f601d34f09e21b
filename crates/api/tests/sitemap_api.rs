//! HTTP-level integration tests for sitemap preview and publishing.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, get, post_auth, post_json_auth};
use serde_json::{json, Value};
use sqlx::PgPool;

fn location(id: &str, title: &str, kind: &str, parent: Option<&str>) -> Value {
    json!({
        "id": id,
        "title": title,
        "location_type": kind,
        "parent_id": parent,
        "latitude": 38.9072,
        "longitude": -77.0369,
        "country_code": "US",
    })
}

async fn seed(pool: &PgPool, token: &str, records: Vec<Value>) {
    for body in records {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/v1/locations", body, token).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_sitemap(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/sitemap").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_preview_nests_states_and_orders_by_title(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    seed(
        &pool,
        &token,
        vec![
            location("usa", "USA", "country", None),
            location("can", "Canada", "country", None),
            location("tx", "Texas", "state", Some("usa")),
            location("atx", "Austin", "city", Some("tx")),
            location("dc", "Washington DC", "city", Some("usa")),
        ],
    )
    .await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/sitemap").await).await;
    assert_eq!(
        json,
        json!([
            {"Canada": "can", "locations": []},
            {
                "USA": "usa",
                "locations": [
                    {"Texas": "usa/tx", "locations": [{"Austin": "usa/tx/atx"}]},
                    {"Washington DC": "usa/dc"},
                ]
            }
        ])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_requires_admin(pool: PgPool) {
    let owner = common::create_user(&pool, "owner", "property_owner").await;
    let token = common::token_for(&owner);

    let app = common::build_test_app(pool);
    let response = post_auth(app, "/api/v1/admin/sitemap", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publish_writes_indented_artifact(pool: PgPool) {
    let token = common::admin_token(&pool).await;
    seed(
        &pool,
        &token,
        vec![
            location("usa", "USA", "country", None),
            location("tx", "Texas", "state", Some("usa")),
        ],
    )
    .await;

    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_media(pool.clone(), media.path());
    let response = post_auth(app, "/api/v1/admin/sitemap", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["countries"], 1);
    assert_eq!(json["data"]["anomalies"], json!([]));

    let written = std::fs::read_to_string(media.path().join("sitemap.json")).unwrap();
    assert_eq!(json["data"]["bytes_written"], written.len());
    assert!(written.starts_with("[\n    {\n        \"USA\": \"usa\""));

    let parsed: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(
        parsed,
        json!([{"USA": "usa", "locations": [{"Texas": "usa/tx", "locations": []}]}])
    );

    // Publishing again replaces the artifact rather than appending.
    let app = common::build_test_app_with_media(pool.clone(), media.path());
    let response = post_auth(app, "/api/v1/admin/sitemap", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let again = std::fs::read_to_string(media.path().join("sitemap.json")).unwrap();
    assert_eq!(again, written);

    // The preview matches the published content.
    let app = common::build_test_app_with_media(pool, media.path());
    let preview = body_text(get(app, "/api/v1/sitemap").await).await;
    assert_eq!(serde_json::from_str::<Value>(&preview).unwrap(), parsed);
}
