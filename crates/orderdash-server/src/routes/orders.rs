use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use orderdash_core::aggregate::{
    compute_daily_counts, compute_daily_revenue, compute_order_kpis, compute_status_distribution,
    compute_summary, filter_since, rank_recent,
};

use crate::{
    error::AppError,
    routes::{parse_days, parse_limit},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub days: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
}

/// `GET /api/orders` - Orders, most recent first. Undated orders come last.
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.snapshot();
    let limit = parse_limit(query.limit.as_deref())?.unwrap_or(snapshot.orders.len());
    let orders = rank_recent(snapshot.orders.iter(), limit);

    Ok(Json(json!({
        "data": orders,
        "pagination": {
            "limit": limit,
            "total": snapshot.orders.len()
        }
    })))
}

/// `GET /api/orders/stats` - KPI tiles over every order plus the daily
/// order-count chart.
pub async fn get_order_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, AppError> {
    let days = parse_days(query.days.as_deref(), state.config.orders_chart_days)?;
    let snapshot = state.snapshot();

    let kpis = compute_order_kpis(snapshot.orders.iter());
    let daily_counts = compute_daily_counts(
        snapshot.orders.iter(),
        days,
        state.reference_date(),
        &state.config.timezone,
    );

    Ok(Json(json!({
        "data": {
            "kpis": kpis,
            "windowDays": days,
            "dailyCounts": daily_counts
        }
    })))
}

/// `GET /api/orders/daily-revenue` - Revenue per day and the matching
/// summary over the same window.
pub async fn get_daily_revenue(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, AppError> {
    let days = parse_days(query.days.as_deref(), state.config.dashboard_days)?;
    let snapshot = state.snapshot();
    let reference = state.reference_date();
    let tz = &state.config.timezone;

    let series = compute_daily_revenue(snapshot.orders.iter(), days, reference, tz);
    let summary = compute_summary(snapshot.orders.iter(), days, reference, tz);

    Ok(Json(json!({
        "data": {
            "windowDays": days,
            "referenceDate": reference.to_string(),
            "series": series,
            "summary": summary
        }
    })))
}

/// `GET /api/orders/status` - Orders per status over the trailing window.
pub async fn get_status_distribution(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, AppError> {
    let days = parse_days(query.days.as_deref(), state.config.status_window_days)?;
    let snapshot = state.snapshot();

    let recent = filter_since(
        snapshot.orders.iter(),
        days,
        state.reference_date(),
        &state.config.timezone,
    );
    let distribution = compute_status_distribution(recent);

    Ok(Json(json!({
        "data": {
            "windowDays": days,
            "distribution": distribution
        }
    })))
}
