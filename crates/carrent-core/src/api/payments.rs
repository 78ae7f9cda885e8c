use std::sync::Arc;

use carrent_shared::dto::CreatePaymentSessionRequest;

use super::ReservationsApi;
use crate::domain::{
    Checkout, CheckoutSession, NewReservation, PaymentReturn, PaymentVerification,
};
use crate::error::{ApiError, ApiResult};
use crate::gateway::{Gateway, RequestOptions, encode_segment, with_query};
use crate::ports::Method;

/// Pages the checkout provider returns the user to.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl Default for PaymentUrls {
    fn default() -> Self {
        Self {
            success_url: "http://localhost:5500/pages/payments/payment-success.html".to_string(),
            cancel_url: "http://localhost:5500/pages/payments/payment-failed.html".to_string(),
        }
    }
}

impl PaymentUrls {
    fn for_reservation(&self, reservation_id: i64) -> (String, String) {
        (
            append_reservation(&self.success_url, reservation_id),
            append_reservation(&self.cancel_url, reservation_id),
        )
    }
}

/// `/Payment/*` endpoints and the reservation → checkout flow.
#[derive(Clone)]
pub struct PaymentsApi {
    gateway: Arc<Gateway>,
    urls: PaymentUrls,
}

impl PaymentsApi {
    pub fn new(gateway: Arc<Gateway>, urls: PaymentUrls) -> Self {
        Self { gateway, urls }
    }

    /// Open a hosted checkout page for an existing reservation.
    pub async fn create_session(&self, reservation_id: i64) -> ApiResult<CheckoutSession> {
        if reservation_id <= 0 {
            return Err(ApiError::InvalidInput(
                "Reservation ID is required".to_string(),
            ));
        }

        let (success_url, cancel_url) = self.urls.for_reservation(reservation_id);
        let body = serde_json::to_value(CreatePaymentSessionRequest {
            reservation_id,
            success_url,
            cancel_url,
        })
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?;

        let payload = self
            .gateway
            .request(
                "/Payment/create-session",
                RequestOptions::new(Method::Post).json(body),
            )
            .await?;

        CheckoutSession::from_value(&payload.into_value()).ok_or_else(|| {
            ApiError::UnexpectedResponse("no checkout URL in payment response".to_string())
        })
    }

    pub async fn verify_session(&self, session_id: &str) -> ApiResult<PaymentVerification> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(ApiError::InvalidInput("Session ID is required".to_string()));
        }

        let payload = self
            .gateway
            .request(
                &format!("/Payment/session/{}", encode_segment(session_id)),
                RequestOptions::default(),
            )
            .await?;
        Ok(PaymentVerification::from_value(&payload.into_value()))
    }

    pub async fn verify_reservation(&self, reservation_id: i64) -> ApiResult<PaymentVerification> {
        let path = with_query(
            "/Payment/verify",
            &[("reservationId", reservation_id.to_string())],
        );
        let payload = self
            .gateway
            .request(&path, RequestOptions::default())
            .await?;
        Ok(PaymentVerification::from_value(&payload.into_value()))
    }

    /// Verify the payment named by the provider's return parameters.
    /// The checkout session id wins over the reservation id.
    pub async fn verify_return(&self, ret: &PaymentReturn) -> ApiResult<PaymentVerification> {
        if let Some(session_id) = &ret.session_id {
            return self.verify_session(session_id).await;
        }

        let reservation_id = ret
            .reservation_id
            .as_deref()
            .and_then(|id| id.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                ApiError::InvalidInput("No payment information in the return URL".to_string())
            })?;
        self.verify_reservation(reservation_id).await
    }

    /// Reserve a car and open checkout for it.
    pub async fn checkout(&self, reservation: &NewReservation) -> ApiResult<Checkout> {
        let reservations = ReservationsApi::new(self.gateway.clone());

        let created = reservations.create(reservation).await?;
        let reservation_id = reservations
            .resolve_created_id(reservation, &created)
            .await?;
        tracing::info!(reservation_id, "Reservation created, opening checkout");

        let session = self.create_session(reservation_id).await?;
        Ok(Checkout {
            reservation_id,
            checkout_url: session.checkout_url,
        })
    }
}

fn append_reservation(url: &str, reservation_id: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}reservationId={}", url, separator, reservation_id)
}
