use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth, routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Middleware is applied in outer-to-inner order (outermost runs first on
/// request, last on response):
///
/// 1. `CorsLayer` - the dashboard front end is served from another origin.
/// 2. `TraceLayer` - structured request/response logging via `tracing`.
/// 3. Role gating, per route group (see [`auth`]).
pub fn build_app(state: Arc<AppState>) -> Router {
    let members = Router::new()
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        .route("/api/orders", get(routes::orders::list_orders))
        .route("/api/orders/stats", get(routes::orders::get_order_stats))
        .route(
            "/api/orders/daily-revenue",
            get(routes::orders::get_daily_revenue),
        )
        .route(
            "/api/orders/status",
            get(routes::orders::get_status_distribution),
        )
        .route_layer(middleware::from_fn(auth::require_member));

    let admins = Router::new()
        .route("/api/products", get(routes::products::list_products))
        .route("/api/users", get(routes::users::list_users))
        .route(
            "/api/snapshot/{collection}",
            put(routes::snapshot::replace_collection),
        )
        .route_layer(middleware::from_fn(auth::require_admin));

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(members)
        .merge(admins)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Permissive when no origins (or `*`) are configured, otherwise an explicit
/// list.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
