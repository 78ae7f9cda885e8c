use serde::Serialize;
use serde_json::Value;

use crate::decode::{
    self, MAKE_KEYS, MODEL_KEYS, RENTAL_COUNT_KEYS, RESERVATION_COUNT_KEYS, REVENUE_KEYS,
    SERIES_AMOUNT_KEYS, SERIES_LABEL_KEYS,
};

/// Headline figures for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralStats {
    pub total_revenue: f64,
    pub active_reservations: i64,
    pub total_cars: i64,
    pub total_users: i64,
}

impl GeneralStats {
    /// Missing figures default to zero.
    pub fn from_value(value: &Value) -> Self {
        Self {
            total_revenue: decode::pick_f64(value, REVENUE_KEYS).unwrap_or(0.0),
            active_reservations: decode::pick_i64(value, RESERVATION_COUNT_KEYS).unwrap_or(0),
            total_cars: decode::pick_i64(value, &["totalCars"]).unwrap_or(0),
            total_users: decode::pick_i64(value, &["totalUsers"]).unwrap_or(0),
        }
    }
}

/// One row of the most-rented cars table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCar {
    pub make: String,
    pub model: String,
    pub rental_count: i64,
    pub revenue: f64,
}

impl TopCar {
    pub fn from_value(value: &Value) -> Self {
        Self {
            make: decode::pick_str(value, MAKE_KEYS).unwrap_or_default(),
            model: decode::pick_str(value, MODEL_KEYS).unwrap_or_default(),
            rental_count: decode::pick_i64(value, RENTAL_COUNT_KEYS).unwrap_or(0),
            revenue: decode::pick_f64(value, &["revenue"]).unwrap_or(0.0),
        }
    }
}

/// One bucket of a revenue chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub label: String,
    pub amount: f64,
}

impl RevenuePoint {
    pub fn from_value(value: &Value) -> Self {
        Self {
            label: decode::pick_str(value, SERIES_LABEL_KEYS).unwrap_or_default(),
            amount: decode::pick_f64(value, SERIES_AMOUNT_KEYS).unwrap_or(0.0),
        }
    }
}

/// Decode a revenue series.
///
/// The backend answers either with an array of points or with parallel
/// `labels` / `data` arrays. Anything else is an empty series.
pub fn revenue_series(value: &Value) -> Vec<RevenuePoint> {
    if let Some(items) = value.as_array() {
        return items.iter().map(RevenuePoint::from_value).collect();
    }

    let (Some(labels), Some(data)) = (
        value.get("labels").and_then(Value::as_array),
        value.get("data").and_then(Value::as_array),
    ) else {
        return Vec::new();
    };

    labels
        .iter()
        .zip(data.iter())
        .map(|(label, amount)| RevenuePoint {
            label: match label {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            amount: amount
                .as_f64()
                .or_else(|| amount.as_str().and_then(|s| s.parse().ok()))
                .unwrap_or(0.0),
        })
        .collect()
}
