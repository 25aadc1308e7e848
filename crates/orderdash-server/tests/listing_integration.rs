use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use orderdash_core::config::Config;
use orderdash_server::app::build_app;
use orderdash_server::auth::ROLE_HEADER;
use orderdash_server::state::AppState;

fn config() -> Config {
    Config {
        port: 0,
        timezone: chrono_tz::Tz::UTC,
        dashboard_days: 7,
        orders_chart_days: 14,
        status_window_days: 30,
        recent_limit: 5,
        cors_origins: vec![],
        seed_demo: false,
    }
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse JSON")
}

async fn put_collection(app: &axum::Router, collection: &str, items: Value) {
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/api/snapshot/{collection}"))
        .header("content-type", "application/json")
        .header(ROLE_HEADER, "admin")
        .body(Body::from(items.to_string()))
        .expect("request");
    let res = app.clone().oneshot(req).await.expect("put collection");
    assert_eq!(res.status(), StatusCode::OK);
}

async fn get_as_admin(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .header(ROLE_HEADER, "admin")
        .body(Body::empty())
        .expect("request");
    let res = app.clone().oneshot(req).await.expect("get");
    let status = res.status();
    (status, json_body(res).await)
}

fn ids(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|item| item["id"].as_str().map(str::to_string))
        .collect()
}

async fn setup() -> axum::Router {
    let app = build_app(Arc::new(AppState::new(config())));
    put_collection(
        &app,
        "products",
        json!([
            {
                "id": "p1",
                "name": "Brake Pads",
                "price": 49.0,
                "stock": 12,
                "category": "Automotive",
                "active": true,
                "createdAt": "2026-01-03T10:00:00Z"
            },
            {
                "id": "p2",
                "name": "USB Cable",
                "price": 9.5,
                "stock": 40,
                "category": "Electronics",
                "active": true,
                "createdAt": "2026-01-01T10:00:00Z"
            },
            {
                "id": "p3",
                "name": "Desk Lamp",
                "price": 25.0,
                "stock": 0,
                "category": "Home",
                "active": false
            },
            {
                "id": "p4",
                "name": "Car Charger USB",
                "price": 15.0,
                "stock": 8,
                "category": "Automotive",
                "active": false,
                "createdAt": "2026-01-02T10:00:00Z"
            }
        ]),
    )
    .await;
    put_collection(
        &app,
        "users",
        json!([
            { "id": "u1", "email": "admin@example.com", "role": "admin", "disabled": false },
            { "id": "u2", "email": "user1@example.com", "role": "user", "disabled": true },
            { "id": "u3", "email": "user2@example.com", "role": "user" }
        ]),
    )
    .await;
    app
}

// ============================================================
// BDD: Product catalog filters and sorting
// ============================================================
#[tokio::test]
async fn test_products_default_newest_first() {
    let app = setup().await;
    let (status, body) = get_as_admin(&app, "/api/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec!["p1", "p4", "p2", "p3"]);
    assert_eq!(body["total"], 4);
}

#[tokio::test]
async fn test_products_search_category_and_sort() {
    let app = setup().await;

    let (_, body) = get_as_admin(&app, "/api/products?search=usb&sort_by=price&sort_dir=asc").await;
    assert_eq!(ids(&body), vec!["p2", "p4"]);

    let (_, body) = get_as_admin(&app, "/api/products?category=Automotive&only_active=true").await;
    assert_eq!(ids(&body), vec!["p1"]);
}

#[tokio::test]
async fn test_products_reject_unknown_sort() {
    let app = setup().await;
    let (status, body) = get_as_admin(&app, "/api/products?sort_by=name").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, _) = get_as_admin(&app, "/api/products?only_active=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================
// BDD: User list filters
// ============================================================
#[tokio::test]
async fn test_users_filters() {
    let app = setup().await;

    let (_, body) = get_as_admin(&app, "/api/users").await;
    assert_eq!(ids(&body), vec!["u1", "u2", "u3"]);

    let (_, body) = get_as_admin(&app, "/api/users?role=user&show_disabled=false").await;
    assert_eq!(ids(&body), vec!["u3"]);

    let (_, body) = get_as_admin(&app, "/api/users?search=USER1").await;
    assert_eq!(ids(&body), vec!["u2"]);

    let (status, _) = get_as_admin(&app, "/api/users?role=root").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
