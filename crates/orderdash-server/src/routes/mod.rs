pub mod dashboard;
pub mod health;
pub mod orders;
pub mod products;
pub mod snapshot;
pub mod users;

use crate::error::AppError;

/// Longest trailing window a chart may request.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Largest page of orders a listing may request.
pub const MAX_LIMIT: usize = 500;

/// Parse an optional `days` query parameter, falling back to `default`.
pub(crate) fn parse_days(raw: Option<&str>, default: u32) -> Result<u32, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => match s.parse::<u32>() {
            Ok(days) if (1..=MAX_WINDOW_DAYS).contains(&days) => Ok(days),
            _ => Err(AppError::BadRequest(format!(
                "days must be an integer between 1 and {MAX_WINDOW_DAYS}"
            ))),
        },
    }
}

/// Parse an optional `limit` query parameter; `None` means no limit.
pub(crate) fn parse_limit(raw: Option<&str>) -> Result<Option<usize>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => match s.parse::<usize>() {
            Ok(limit) if (1..=MAX_LIMIT).contains(&limit) => Ok(Some(limit)),
            _ => Err(AppError::BadRequest(format!(
                "limit must be an integer between 1 and {MAX_LIMIT}"
            ))),
        },
    }
}

/// Parse an optional boolean flag (`true` / `false`).
pub(crate) fn parse_flag(raw: Option<&str>, name: &str, default: bool) -> Result<bool, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(_) => Err(AppError::BadRequest(format!("{name} must be true or false"))),
    }
}
