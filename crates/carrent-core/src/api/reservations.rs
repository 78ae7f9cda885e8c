use std::sync::Arc;

use serde_json::Value;

use super::records;
use crate::decode::{self, RESERVATION_ID_KEYS};
use crate::domain::{NewReservation, Reservation};
use crate::error::{ApiError, ApiResult};
use crate::gateway::{Gateway, Payload, RequestOptions};
use crate::ports::Method;

/// `/Reservation/*` endpoints.
#[derive(Clone)]
pub struct ReservationsApi {
    gateway: Arc<Gateway>,
}

impl ReservationsApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Reservations of the signed-in user.
    pub async fn mine(&self) -> ApiResult<Vec<Reservation>> {
        let payload = self
            .gateway
            .request("/Reservation/my", RequestOptions::default())
            .await?;
        records(payload, Reservation::from_value)
    }

    /// Every reservation in the system. Admin only.
    pub async fn all(&self) -> ApiResult<Vec<Reservation>> {
        let payload = self
            .gateway
            .request("/Reservation/all", RequestOptions::default())
            .await?;
        records(payload, Reservation::from_value)
    }

    /// Book a car. Returns whatever the backend answered with.
    pub async fn create(&self, reservation: &NewReservation) -> ApiResult<Payload> {
        reservation.validate()?;

        let body = serde_json::to_value(reservation.to_request())
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        self.gateway
            .request(
                "/Reservation/create",
                RequestOptions::new(Method::Post).json(body),
            )
            .await
    }

    pub async fn cancel(&self, id: i64) -> ApiResult<Payload> {
        self.gateway
            .request(
                &format!("/Reservation/{}", id),
                RequestOptions::new(Method::Delete),
            )
            .await
    }

    /// Id of the reservation `reservation` just created.
    ///
    /// Taken from the create response when it carries one, otherwise from the
    /// newest matching entry in the user's reservation list.
    pub(crate) async fn resolve_created_id(
        &self,
        reservation: &NewReservation,
        created: &Payload,
    ) -> ApiResult<i64> {
        if let Some(id) = created_id(created) {
            return Ok(id);
        }

        tracing::debug!(
            car_id = reservation.car_id,
            "Create response carried no id, looking it up"
        );

        self.mine()
            .await?
            .into_iter()
            .filter(|r| reservation.matches(r))
            .map(|r| r.id)
            .max()
            .ok_or_else(|| {
                ApiError::UnexpectedResponse(
                    "could not determine the id of the new reservation".to_string(),
                )
            })
    }
}

fn created_id(payload: &Payload) -> Option<i64> {
    let id = match payload {
        Payload::Json(Value::Number(n)) => n.as_i64(),
        Payload::Json(value) => decode::pick_i64(value, RESERVATION_ID_KEYS),
        Payload::Text(text) => text.trim().parse().ok(),
        Payload::Empty => None,
    };
    id.filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::testing::{Harness, RequestExt, ok};

    fn booking() -> NewReservation {
        NewReservation::new(
            5,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_sends_dates() {
        let h = Harness::new();
        h.transport.push(ok(r#"{"id":31}"#));

        let api = ReservationsApi::new(h.gateway.clone());
        let payload = api.create(&booking()).await.unwrap();
        assert_eq!(created_id(&payload), Some(31));

        let body = h.transport.requests()[0].json_body().unwrap();
        assert_eq!(
            body,
            json!({ "carId": 5, "startDate": "2025-06-01", "endDate": "2025-06-04" })
        );
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_dates() {
        let h = Harness::new();
        let mut bad = booking();
        bad.end_date = bad.start_date;

        let err = ReservationsApi::new(h.gateway.clone())
            .create(&bad)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Return date must be after pickup date");
        assert!(h.transport.requests().is_empty());
    }

    #[test]
    fn test_created_id_shapes() {
        assert_eq!(created_id(&Payload::Json(json!({ "reservationID": 8 }))), Some(8));
        assert_eq!(created_id(&Payload::Json(json!(12))), Some(12));
        assert_eq!(created_id(&Payload::Text("14".into())), Some(14));
        assert_eq!(created_id(&Payload::Json(json!({ "message": "ok" }))), None);
        assert_eq!(created_id(&Payload::Json(json!({ "id": 0 }))), None);
        assert_eq!(created_id(&Payload::Empty), None);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_newest_match() {
        let h = Harness::new();
        h.transport.push(ok(r#"[
            {"id": 3, "carId": 5, "startDate": "2025-06-01T00:00:00"},
            {"id": 9, "carId": 5, "startDate": "2025-06-01T00:00:00"},
            {"id": 11, "carId": 6, "startDate": "2025-06-01T00:00:00"},
            {"id": 12, "carId": 5, "startDate": "2025-07-01T00:00:00"}
        ]"#));

        let api = ReservationsApi::new(h.gateway.clone());
        let id = api
            .resolve_created_id(&booking(), &Payload::Json(json!({ "message": "Created" })))
            .await
            .unwrap();
        assert_eq!(id, 9);
    }

    #[tokio::test]
    async fn test_resolve_without_match_is_an_error() {
        let h = Harness::new();
        h.transport.push(ok("[]"));

        let err = ReservationsApi::new(h.gateway.clone())
            .resolve_created_id(&booking(), &Payload::Empty)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_cancel_path() {
        let h = Harness::new();
        h.transport.push(ok(""));

        ReservationsApi::new(h.gateway.clone()).cancel(3).await.unwrap();
        let sent = h.transport.requests();
        assert_eq!(sent[0].method, Method::Delete);
        assert!(sent[0].url.ends_with("/Reservation/3"));
    }
}
