use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use orderdash_core::listing::{filter_products, ProductQuery, ProductSortKey, SortDirection};

use crate::{error::AppError, routes::parse_flag, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub only_active: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// `GET /api/products` - Catalog filtered and sorted in memory.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ProductQuery {
        only_active: parse_flag(query.only_active.as_deref(), "only_active", false)?,
        sort_by: ProductSortKey::parse(query.sort_by.as_deref())?,
        sort_dir: SortDirection::parse(query.sort_dir.as_deref())?,
        search: query.search,
        category: query.category,
    };

    let snapshot = state.snapshot();
    let products = filter_products(&snapshot.products, &filter);

    Ok(Json(json!({
        "data": products,
        "total": snapshot.products.len()
    })))
}
