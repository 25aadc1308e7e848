use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::decode::{
    lenient_amount, lenient_bool, lenient_f64, lenient_i64, lenient_role, lenient_string,
    lenient_text, lenient_timestamp,
};
use crate::role::Role;

/// Status bucket for orders with no usable status.
pub const UNKNOWN_STATUS: &str = "unknown";

/// One order document as delivered by the data-access collaborator.
///
/// Fields are kept raw; use [`OrderRecord::amount_value`] and
/// [`OrderRecord::status_key`] for the normalized values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    /// `None` means the source of truth has not time-stamped the order yet.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderRecord {
    /// `total`, then `amount`, then 0.
    pub fn amount_value(&self) -> f64 {
        [self.total, self.amount]
            .into_iter()
            .flatten()
            .find(|a| a.is_finite() && *a >= 0.0)
            .unwrap_or(0.0)
    }

    pub fn status_key(&self) -> String {
        normalize_status(self.status.as_deref())
    }

    /// Calendar date of the order in `tz`, or `None` for unknown time.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        self.created_at.map(|ts| ts.with_timezone(tz).date_naive())
    }
}

/// Lower-cased, trimmed status; blank or missing maps to [`UNKNOWN_STATUS`].
pub fn normalize_status(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_lowercase(),
        _ => UNKNOWN_STATUS.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub active: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(default = "default_role", deserialize_with = "lenient_role")]
    pub role: Role,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_role() -> Role {
    Role::User
}
