//! Lenient field decoders for records delivered by the document store.
//!
//! A malformed field never rejects the whole record: each decoder maps
//! whatever JSON value it finds to a defined default instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::role::Role;

/// Interpret a JSON value as a point in time.
///
/// Accepted shapes:
/// - RFC 3339 string, e.g. `"2026-02-10T10:00:00Z"`
/// - epoch milliseconds as an integer or float
/// - document-store timestamp object `{ "seconds": .., "nanoseconds": .. }`
///   (the `_seconds` / `_nanoseconds` spelling is accepted too)
///
/// Returns `None` for anything else, including out-of-range values.
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => match n.as_i64() {
            Some(millis) => DateTime::from_timestamp_millis(millis),
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .and_then(|f| DateTime::from_timestamp_millis(f as i64)),
        },
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))?
                .as_i64()?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
        _ => None,
    }
}

/// A monetary amount is usable only when it is a finite, non-negative number.
pub fn amount_from_value(value: &Value) -> Option<f64> {
    value.as_f64().filter(|a| a.is_finite() && *a >= 0.0)
}

pub(crate) fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(timestamp_from_value(&value))
}

pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0))
}

pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
        .unwrap_or(0))
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

/// Unknown or missing roles fall back to the least-privileged role.
pub(crate) fn lenient_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let role = lenient_string(deserializer)?
        .as_deref()
        .and_then(Role::parse)
        .unwrap_or(Role::User);
    Ok(role)
}
