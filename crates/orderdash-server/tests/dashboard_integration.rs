use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
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

/// Fixed "today" for every request in this file.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date")
}

fn fixed_now() -> DateTime<Utc> {
    today()
        .and_time(NaiveTime::from_hms_opt(18, 30, 0).expect("valid time"))
        .and_utc()
}

fn setup() -> (Arc<AppState>, axum::Router) {
    let state = Arc::new(AppState::with_clock(config(), Arc::new(fixed_now)));
    let app = build_app(Arc::clone(&state));
    (state, app)
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

/// RFC 3339 timestamp at noon UTC, `days_ago` days before [`today`].
fn noon(days_ago: i64) -> String {
    (today() - Duration::days(days_ago))
        .and_time(NaiveTime::from_hms_opt(12, 0, 0).expect("valid time"))
        .and_utc()
        .to_rfc3339()
}

async fn put_orders(app: &axum::Router, orders: Value) -> Value {
    let req = Request::builder()
        .method("PUT")
        .uri("/api/snapshot/orders")
        .header("content-type", "application/json")
        .header(ROLE_HEADER, "admin")
        .body(Body::from(orders.to_string()))
        .expect("request");
    let res = app.clone().oneshot(req).await.expect("put orders");
    assert_eq!(res.status(), StatusCode::OK);
    json_body(res).await
}

async fn get_as_user(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .uri(uri)
        .header(ROLE_HEADER, "user")
        .body(Body::empty())
        .expect("request");
    let res = app.clone().oneshot(req).await.expect("get");
    let status = res.status();
    (status, json_body(res).await)
}

fn sample_orders() -> Value {
    json!([
        { "id": "o1", "status": "Paid", "total": 100.0, "createdAt": noon(2) },
        { "id": "o2", "status": "paid", "amount": 50.0, "createdAt": noon(1) },
        { "id": "o3", "status": "", "createdAt": noon(0) },
        { "id": "o4", "createdAt": null, "total": 999.0 },
        { "id": "o5", "status": "CANCELLED", "total": 25.5, "createdAt": noon(20) },
        { "id": "o6", "status": "pending", "total": 10.0, "createdAt": noon(45) }
    ])
}

// ============================================================
// BDD: Snapshot replacement is reflected on the dashboard
// ============================================================
#[tokio::test]
async fn test_dashboard_reflects_replaced_snapshot() {
    let (_state, app) = setup();

    let ack = put_orders(&app, sample_orders()).await;
    assert_eq!(ack["data"]["accepted"], 6);
    assert_eq!(ack["data"]["skipped"], 0);

    let (status, body) = get_as_user(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];

    assert_eq!(data["counts"]["orders"], 6);
    assert_eq!(data["counts"]["products"], 0);

    let daily = data["dailyRevenue"].as_array().expect("daily series");
    assert_eq!(daily.len(), 7);
    assert_eq!(
        daily[6]["dateKey"],
        today().format("%Y-%m-%d").to_string()
    );
    assert_eq!(daily[4]["revenue"], 100.0);
    assert_eq!(daily[5]["revenue"], 50.0);
    assert_eq!(daily[6]["revenue"], 0.0);

    let summary = &data["summary"];
    assert_eq!(summary["totalRevenue"], 150.0);
    assert_eq!(summary["orderCount"], 3);
    assert_eq!(summary["avgOrderValue"], 50.0);
    assert_eq!(summary["todayCount"], 1);

    // Status breakdown over the trailing 30 days; undated and 45-day-old
    // orders are outside it.
    let distribution = data["statusDistribution"].as_array().expect("distribution");
    let count_of = |status: &str| {
        distribution
            .iter()
            .find(|s| s["status"] == status)
            .and_then(|s| s["count"].as_u64())
    };
    assert_eq!(count_of("paid"), Some(2));
    assert_eq!(count_of("unknown"), Some(1));
    assert_eq!(count_of("cancelled"), Some(1));
    assert_eq!(count_of("pending"), None);

    let recent: Vec<&str> = data["recentOrders"]
        .as_array()
        .expect("recent orders")
        .iter()
        .filter_map(|o| o["id"].as_str())
        .collect();
    assert_eq!(recent, vec!["o3", "o2", "o1", "o5"]);
}

#[tokio::test]
async fn test_second_snapshot_replaces_not_merges() {
    let (state, app) = setup();

    put_orders(&app, sample_orders()).await;
    put_orders(
        &app,
        json!([{ "id": "only", "status": "paid", "total": 5.0, "createdAt": noon(0) }]),
    )
    .await;

    assert_eq!(state.snapshot().orders.len(), 1);
    assert_eq!(state.snapshot().received_at, Some(fixed_now()));
    assert_eq!(state.reference_date(), today());

    let (_, body) = get_as_user(&app, "/api/dashboard").await;
    assert_eq!(body["data"]["counts"]["orders"], 1);
    assert_eq!(body["data"]["summary"]["totalRevenue"], 5.0);
}

#[tokio::test]
async fn test_empty_snapshot_has_zero_average() {
    let (_state, app) = setup();

    let (status, body) = get_as_user(&app, "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["orderCount"], 0);
    assert_eq!(body["data"]["summary"]["avgOrderValue"], 0.0);
    assert_eq!(body["data"]["dailyRevenue"].as_array().map(Vec::len), Some(7));
}

#[tokio::test]
async fn test_non_object_elements_are_skipped() {
    let (_state, app) = setup();

    let ack = put_orders(
        &app,
        json!([
            { "id": "a", "total": 1.0 },
            "garbage",
            42,
            [],
            ["x", null, null, "paid", 10.0],
            { "id": "b" }
        ]),
    )
    .await;
    assert_eq!(ack["data"]["accepted"], 2);
    assert_eq!(ack["data"]["skipped"], 4);

    let (_, body) = get_as_user(&app, "/api/orders/stats").await;
    assert_eq!(body["data"]["kpis"]["count"], 2);
    assert_eq!(body["data"]["kpis"]["revenue"], 1.0);
}

// ============================================================
// BDD: Orders page endpoints
// ============================================================
#[tokio::test]
async fn test_order_stats_kpis_and_daily_counts() {
    let (_state, app) = setup();
    put_orders(
        &app,
        json!([
            { "id": "a", "status": "completed", "total": 129.9, "createdAt": noon(1) },
            { "id": "b", "status": "pending", "total": 59.0, "createdAt": noon(1) },
            { "id": "c", "status": "cancelled", "total": 49.0, "createdAt": noon(0) },
            { "id": "d", "status": "completed", "total": 1.0, "createdAt": noon(90) }
        ]),
    )
    .await;

    let (status, body) = get_as_user(&app, "/api/orders/stats").await;
    assert_eq!(status, StatusCode::OK);
    let kpis = &body["data"]["kpis"];
    assert_eq!(kpis["count"], 4);
    assert_eq!(kpis["completedCount"], 2);
    assert_eq!(kpis["pendingCount"], 1);

    let counts = body["data"]["dailyCounts"].as_array().expect("daily counts");
    assert_eq!(counts.len(), 14);
    assert_eq!(counts[12]["count"], 2);
    assert_eq!(counts[13]["count"], 1);
}

#[tokio::test]
async fn test_daily_revenue_window_parameter() {
    let (_state, app) = setup();
    put_orders(
        &app,
        json!([
            { "id": "a", "total": 10.0, "createdAt": noon(0) },
            { "id": "b", "total": 20.0, "createdAt": noon(10) }
        ]),
    )
    .await;

    let (_, body) = get_as_user(&app, "/api/orders/daily-revenue?days=14").await;
    assert_eq!(body["data"]["windowDays"], 14);
    assert_eq!(body["data"]["series"].as_array().map(Vec::len), Some(14));
    assert_eq!(body["data"]["summary"]["totalRevenue"], 30.0);

    let (_, body) = get_as_user(&app, "/api/orders/daily-revenue").await;
    assert_eq!(body["data"]["summary"]["totalRevenue"], 10.0);

    let (status, body) = get_as_user(&app, "/api/orders/daily-revenue?days=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_status_distribution_window() {
    let (_state, app) = setup();
    put_orders(&app, sample_orders()).await;

    let (_, body) = get_as_user(&app, "/api/orders/status?days=60").await;
    let total: u64 = body["data"]["distribution"]
        .as_array()
        .expect("distribution")
        .iter()
        .filter_map(|s| s["count"].as_u64())
        .sum();
    assert_eq!(total, 5);
}

#[tokio::test]
async fn test_list_orders_most_recent_first() {
    let (_state, app) = setup();
    put_orders(&app, sample_orders()).await;

    let (_, body) = get_as_user(&app, "/api/orders").await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .expect("orders")
        .iter()
        .filter_map(|o| o["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["o3", "o2", "o1", "o5", "o6", "o4"]);
    assert_eq!(body["pagination"]["total"], 6);

    let (_, body) = get_as_user(&app, "/api/orders?limit=2").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let (status, _) = get_as_user(&app, "/api/orders?limit=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
