//! Typed wrappers around the backend endpoints.
//!
//! Each wrapper is a thin layer over the shared [`Gateway`]: it picks the
//! path and method, validates input that would otherwise round-trip to the
//! server, and turns the payload into domain types.

mod auth;
mod cars;
mod notifications;
mod payments;
mod reports;
mod reservations;

use std::sync::Arc;

use serde_json::Value;

pub use auth::{AuthApi, HOME_LOCATION, LoginOutcome};
pub use cars::CarsApi;
pub use notifications::NotificationsApi;
pub use payments::{PaymentUrls, PaymentsApi};
pub use reports::ReportsApi;
pub use reservations::ReservationsApi;

use crate::error::{ApiError, ApiResult};
use crate::gateway::{Gateway, Payload};
use crate::poller::{NotificationPoller, PollerConfig};
use crate::ports::{TokenInspector, Ticker};

/// Entry point bundling every endpoint wrapper over one gateway.
#[derive(Clone)]
pub struct CarRentalClient {
    gateway: Arc<Gateway>,
    inspector: Option<Arc<dyn TokenInspector>>,
    payment_urls: PaymentUrls,
}

impl CarRentalClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            inspector: None,
            payment_urls: PaymentUrls::default(),
        }
    }

    /// Decode the session token to answer "who am I" / "am I admin".
    pub fn with_inspector(mut self, inspector: Arc<dyn TokenInspector>) -> Self {
        self.inspector = Some(inspector);
        self
    }

    /// Where the checkout provider sends the user back.
    pub fn with_payment_urls(mut self, urls: PaymentUrls) -> Self {
        self.payment_urls = urls;
        self
    }

    pub fn gateway(&self) -> &Arc<Gateway> {
        &self.gateway
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.gateway.clone(), self.inspector.clone())
    }

    pub fn cars(&self) -> CarsApi {
        CarsApi::new(self.gateway.clone())
    }

    pub fn reservations(&self) -> ReservationsApi {
        ReservationsApi::new(self.gateway.clone())
    }

    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(self.gateway.clone())
    }

    pub fn payments(&self) -> PaymentsApi {
        PaymentsApi::new(self.gateway.clone(), self.payment_urls.clone())
    }

    pub fn reports(&self) -> ReportsApi {
        ReportsApi::new(self.gateway.clone())
    }

    /// A poller feeding notification snapshots, driven by `ticker`.
    pub fn notification_poller(
        &self,
        ticker: Arc<dyn Ticker>,
        config: PollerConfig,
    ) -> NotificationPoller {
        NotificationPoller::new(self.notifications(), ticker, config)
    }
}

/// Decode a list payload record by record.
///
/// An empty response is an empty list. Records `decode` rejects are dropped
/// with a debug log rather than failing the whole list.
pub(crate) fn records<T>(payload: Payload, decode: impl Fn(&Value) -> Option<T>) -> ApiResult<Vec<T>> {
    if payload.is_empty() {
        return Ok(Vec::new());
    }

    match payload.into_value() {
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(|item| {
                let record = decode(item);
                if record.is_none() {
                    tracing::debug!(%item, "Skipping malformed record");
                }
                record
            })
            .collect()),
        other => Err(ApiError::UnexpectedResponse(format!(
            "expected a list, got {}",
            kind_of(&other)
        ))),
    }
}

/// Decode a single-record payload.
pub(crate) fn record<T>(payload: Payload, decode: impl Fn(&Value) -> Option<T>) -> ApiResult<T> {
    let value = payload.into_value();
    decode(&value).ok_or_else(|| {
        ApiError::UnexpectedResponse(format!("unrecognised {} payload", kind_of(&value)))
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "empty",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
