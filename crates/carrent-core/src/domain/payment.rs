use serde::Serialize;
use serde_json::Value;

use crate::decode::{self, CHECKOUT_URL_KEYS};

/// Hosted checkout page issued by the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub checkout_url: String,
}

impl CheckoutSession {
    pub fn from_value(value: &Value) -> Option<Self> {
        let checkout_url = decode::pick_str(value, CHECKOUT_URL_KEYS)?;
        Some(Self { checkout_url })
    }
}

/// Result of the reservation → checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub reservation_id: i64,
    pub checkout_url: String,
}

/// Final state of a payment as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Succeeded,
    Pending,
    Failed,
}

impl PaymentState {
    /// `Paid` and `Completed` count as success; anything unknown is a failure.
    pub fn from_status(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "paid" | "completed" | "succeeded" => PaymentState::Succeeded,
            "pending" | "processing" => PaymentState::Pending,
            _ => PaymentState::Failed,
        }
    }
}

/// Verification answer for a reservation or checkout session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub reservation_id: Option<i64>,
    pub status: String,
    pub state: PaymentState,
    pub message: Option<String>,
}

impl PaymentVerification {
    pub fn from_value(value: &Value) -> Self {
        let status = decode::pick_str(value, &["status", "paymentStatus"]).unwrap_or_default();
        let paid_flag = decode::pick_bool(value, &["isPaid", "paid"]);

        let state = match paid_flag {
            Some(true) => PaymentState::Succeeded,
            _ => PaymentState::from_status(&status),
        };

        Self {
            reservation_id: decode::pick_i64(value, &["reservationId", "reservationID"]),
            status,
            state,
            message: decode::pick_str(value, &["message"]),
        }
    }
}

/// Parameters the checkout provider appends when sending the user back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentReturn {
    pub session_id: Option<String>,
    pub reservation_id: Option<String>,
}

impl PaymentReturn {
    /// Read `session_id` / `reservationId` from a query string (leading `?` allowed).
    pub fn from_query(query: &str) -> Self {
        let mut ret = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "session_id" => ret.session_id = Some(value.into_owned()),
                "reservationId" => ret.reservation_id = Some(value.into_owned()),
                _ => {}
            }
        }
        ret
    }

    /// Read the parameters from a full return URL.
    pub fn from_url(url: &str) -> Self {
        match url.split_once('?') {
            Some((_, query)) => Self::from_query(query.split('#').next().unwrap_or(query)),
            None => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.session_id.is_none() && self.reservation_id.is_none()
    }
}
