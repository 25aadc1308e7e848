use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use orderdash_core::listing::{filter_users, UserQuery};
use orderdash_core::role::Role;

use crate::{error::AppError, routes::parse_flag, state::AppState};

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub role: Option<String>,
    pub show_disabled: Option<String>,
}

/// `GET /api/users` - Accounts filtered by email, role and disabled flag.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = UserQuery {
        role: Role::parse_filter(query.role.as_deref())?,
        show_disabled: parse_flag(query.show_disabled.as_deref(), "show_disabled", true)?,
        search: query.search,
    };

    let snapshot = state.snapshot();
    let users = filter_users(&snapshot.users, &filter);

    Ok(Json(json!({
        "data": users,
        "total": snapshot.users.len()
    })))
}
