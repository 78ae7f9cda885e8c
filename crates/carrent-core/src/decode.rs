//! Tolerant decoding at the API boundary.
//!
//! The backend is not consistent about field names: the same concept shows
//! up as `totalRevenue` on one endpoint and `revenue` on another, ids come
//! back as `id`, `reservationId` or `Id`. All alias tables live here so call
//! sites only deal with canonical fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

pub const REVENUE_KEYS: &[&str] = &["totalRevenue", "revenue"];
pub const RESERVATION_COUNT_KEYS: &[&str] = &["activeReservations", "totalReservations"];
pub const MAKE_KEYS: &[&str] = &["make", "brand"];
pub const MODEL_KEYS: &[&str] = &["model", "name"];
pub const RENTAL_COUNT_KEYS: &[&str] = &["rentalCount", "rentCount", "count"];
pub const SERIES_LABEL_KEYS: &[&str] = &["date", "day", "month", "label"];
pub const SERIES_AMOUNT_KEYS: &[&str] = &["revenue", "total", "amount"];
pub const TOKEN_KEYS: &[&str] = &["token", "accessToken", "data.token"];
pub const RESERVATION_ID_KEYS: &[&str] = &["id", "reservationId", "reservationID", "Id"];
pub const CHECKOUT_URL_KEYS: &[&str] = &["checkoutUrl", "url", "redirectUrl"];
pub const READ_FLAG_KEYS: &[&str] = &["read", "isRead"];
pub const MESSAGE_KEYS: &[&str] = &["message", "Message"];

/// First present, non-null value among `keys`. Dotted keys walk nested objects.
pub fn pick<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find(|v| !v.is_null())
}

/// Like [`pick`], as a non-empty string. Numbers are rendered.
pub fn pick_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find_map(as_string)
}

/// Like [`pick`], as a number. Numeric strings are accepted.
pub fn pick_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find_map(as_f64)
}

/// Like [`pick_f64`], for integral values.
pub fn pick_i64(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find_map(as_i64)
}

/// Like [`pick`], as a boolean.
pub fn pick_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find_map(Value::as_bool)
}

/// Like [`pick`], as a UTC timestamp. Timestamps without an offset are taken as UTC.
pub fn pick_datetime(value: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .filter_map(Value::as_str)
        .find_map(parse_datetime)
}

/// Like [`pick`], as a calendar date. The time part of a timestamp is dropped.
pub fn pick_date(value: &Value, keys: &[&str]) -> Option<NaiveDate> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .filter_map(Value::as_str)
        .find_map(|s| {
            let day = s.split('T').next().unwrap_or(s);
            NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d").ok()
        })
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
