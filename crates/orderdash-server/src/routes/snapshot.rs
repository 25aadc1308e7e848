use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{auth::RoleContext, error::AppError, state::AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Orders,
    Products,
    Users,
}

impl Collection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "orders" => Some(Self::Orders),
            "products" => Some(Self::Products),
            "users" => Some(Self::Users),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Products => "products",
            Self::Users => "users",
        }
    }
}

/// `PUT /api/snapshot/{collection}` - Replace a whole collection.
///
/// The body is the complete current contents as a JSON array; the previous
/// contents are discarded, never merged. Elements that are not JSON objects
/// are skipped and counted.
pub async fn replace_collection(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    Extension(ctx): Extension<RoleContext>,
    Json(items): Json<Vec<Value>>,
) -> Result<impl IntoResponse, AppError> {
    let collection = Collection::parse(&collection)
        .ok_or_else(|| AppError::NotFound(format!("Unknown collection '{collection}'")))?;

    let received = items.len();
    let accepted = match collection {
        Collection::Orders => {
            let records = decode_all(items, collection);
            let n = records.len();
            state.replace_orders(records);
            n
        }
        Collection::Products => {
            let records = decode_all(items, collection);
            let n = records.len();
            state.replace_products(records);
            n
        }
        Collection::Users => {
            let records = decode_all(items, collection);
            let n = records.len();
            state.replace_users(records);
            n
        }
    };

    info!(
        collection = collection.as_str(),
        received,
        accepted,
        role = ctx.role.as_str(),
        "Snapshot collection replaced"
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "data": {
                "collection": collection.as_str(),
                "accepted": accepted,
                "skipped": received - accepted
            }
        })),
    ))
}

fn decode_all<T: DeserializeOwned>(items: Vec<Value>, collection: Collection) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            // Derived `Deserialize` also maps arrays onto fields by position.
            if !item.is_object() {
                warn!(
                    collection = collection.as_str(),
                    index, "Skipping non-object record"
                );
                return None;
            }
            match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(
                        collection = collection.as_str(),
                        index,
                        error = %e,
                        "Skipping undecodable record"
                    );
                    None
                }
            }
        })
        .collect()
}
