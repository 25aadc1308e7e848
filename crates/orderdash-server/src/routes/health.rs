use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// `GET /health` - liveness check.
///
/// Always `200 OK` while the process serves requests. `snapshot_received_at`
/// is `null` until the data-access collaborator has pushed a first snapshot.
///
/// Response shape:
/// ```json
/// { "status": "ok", "version": "0.1.0", "snapshot_received_at": null }
/// ```
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let received_at = state.snapshot().received_at;
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "snapshot_received_at": received_at
        })),
    )
}
