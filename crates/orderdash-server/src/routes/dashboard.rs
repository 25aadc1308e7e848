use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use orderdash_core::aggregate::build_dashboard;

use crate::{error::AppError, state::AppState};

/// `GET /api/dashboard` - Entity counts, trailing revenue, status breakdown
/// and most recent orders, all derived from the current snapshot.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.snapshot();
    let options = state.config.dashboard_options();
    let view = build_dashboard(
        &snapshot.orders,
        &options,
        state.reference_date(),
        &state.config.timezone,
    );

    Ok(Json(json!({
        "data": {
            "counts": {
                "users": snapshot.users.len(),
                "products": snapshot.products.len(),
                "orders": snapshot.orders.len()
            },
            "windowDays": options.window_days,
            "statusWindowDays": options.status_window_days,
            "dailyRevenue": view.daily_revenue,
            "summary": view.summary,
            "statusDistribution": view.status_distribution,
            "recentOrders": view.recent_orders
        }
    })))
}
