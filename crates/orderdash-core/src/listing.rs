//! Filtering and sorting of already-fetched product and user lists.

use std::cmp::Ordering;

use crate::error::CoreError;
use crate::record::{ProductRecord, UserRecord};
use crate::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSortKey {
    #[default]
    CreatedAt,
    Price,
    Stock,
}

impl ProductSortKey {
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("createdAt") => Ok(Self::CreatedAt),
            Some("price") => Ok(Self::Price),
            Some("stock") => Ok(Self::Stock),
            Some(_) => Err(CoreError::InvalidQuery(
                "sort_by must be one of: createdAt, price, stock".into(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("desc") => Ok(Self::Desc),
            Some("asc") => Ok(Self::Asc),
            Some(_) => Err(CoreError::InvalidQuery(
                "sort_dir must be one of: asc, desc".into(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub search: Option<String>,
    /// `None` or `"all"` disables the category filter.
    pub category: Option<String>,
    pub only_active: bool,
    pub sort_by: ProductSortKey,
    pub sort_dir: SortDirection,
}

#[derive(Debug, Clone)]
pub struct UserQuery {
    pub search: Option<String>,
    pub role: Option<Role>,
    pub show_disabled: bool,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            search: None,
            role: None,
            show_disabled: true,
        }
    }
}

/// Lower-cased needle, or `None` when the search box is blank.
fn needle(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

pub fn filter_products<'a>(
    products: &'a [ProductRecord],
    query: &ProductQuery,
) -> Vec<&'a ProductRecord> {
    let needle = needle(query.search.as_deref());
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "all");

    let mut list: Vec<&ProductRecord> = products
        .iter()
        .filter(|p| {
            needle
                .as_deref()
                .map_or(true, |n| p.name.to_lowercase().contains(n))
        })
        .filter(|p| category.map_or(true, |c| p.category == c))
        .filter(|p| !query.only_active || p.active)
        .collect();

    list.sort_by(|a, b| {
        let ord = compare_products(a, b, query.sort_by);
        match query.sort_dir {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    list
}

fn compare_products(a: &ProductRecord, b: &ProductRecord, key: ProductSortKey) -> Ordering {
    match key {
        ProductSortKey::Price => a.price.total_cmp(&b.price),
        ProductSortKey::Stock => a.stock.cmp(&b.stock),
        // Undated products sort as the epoch.
        ProductSortKey::CreatedAt => {
            let millis = |p: &ProductRecord| p.created_at.map_or(0, |t| t.timestamp_millis());
            millis(a).cmp(&millis(b))
        }
    }
}

/// Input order is preserved.
pub fn filter_users<'a>(users: &'a [UserRecord], query: &UserQuery) -> Vec<&'a UserRecord> {
    let needle = needle(query.search.as_deref());
    users
        .iter()
        .filter(|u| {
            needle
                .as_deref()
                .map_or(true, |n| u.email.to_lowercase().contains(n))
        })
        .filter(|u| query.role.map_or(true, |r| u.role == r))
        .filter(|u| query.show_disabled || !u.disabled)
        .collect()
}
