use carrent_shared::dto::CreateReservationRequest;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::decode::{self, RESERVATION_ID_KEYS};
use crate::error::{ApiError, ApiResult};

/// A booking of one car for a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    pub car_id: Option<i64>,
    pub car_make: String,
    pub car_model: String,
    pub user_full_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub total_price: f64,
}

impl Reservation {
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            id: decode::pick_i64(value, RESERVATION_ID_KEYS)?,
            car_id: decode::pick_i64(value, &["carId", "car.id"]),
            car_make: decode::pick_str(value, &["carMake", "car.make"]).unwrap_or_default(),
            car_model: decode::pick_str(value, &["carModel", "car.model"]).unwrap_or_default(),
            user_full_name: decode::pick_str(value, &["userFullName", "user.fullName"]),
            start_date: decode::pick_date(value, &["startDate"]),
            end_date: decode::pick_date(value, &["endDate"]),
            status: decode::pick_str(value, &["status"]).unwrap_or_default(),
            total_price: decode::pick_f64(value, &["totalPrice", "total"]).unwrap_or(0.0),
        })
    }
}

/// A reservation about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub car_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewReservation {
    pub fn new(car_id: i64, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            car_id,
            start_date,
            end_date,
        }
    }

    /// The return date must come after the pickup date.
    pub fn validate(&self) -> ApiResult<()> {
        if self.end_date <= self.start_date {
            return Err(ApiError::InvalidInput(
                "Return date must be after pickup date".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of rental days covered.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Whether an existing reservation is the one this request created.
    pub fn matches(&self, reservation: &Reservation) -> bool {
        reservation.car_id == Some(self.car_id)
            && reservation
                .start_date
                .is_none_or(|start| start == self.start_date)
    }

    pub fn to_request(&self) -> CreateReservationRequest {
        CreateReservationRequest {
            car_id: self.car_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reservation_from_value() {
        let r = Reservation::from_value(&json!({
            "id": 17,
            "carId": 3,
            "carMake": "Kia",
            "carModel": "Rio",
            "userFullName": "Sara Adel",
            "startDate": "2025-03-01T00:00:00",
            "endDate": "2025-03-04T00:00:00",
            "status": "Pending",
            "totalPrice": 120
        }))
        .unwrap();

        assert_eq!(r.id, 17);
        assert_eq!(r.start_date, Some(date(2025, 3, 1)));
        assert_eq!(r.total_price, 120.0);
    }

    #[test]
    fn test_validate_date_order() {
        let ok = NewReservation::new(3, date(2025, 3, 1), date(2025, 3, 4));
        assert!(ok.validate().is_ok());
        assert_eq!(ok.days(), 3);

        let same_day = NewReservation::new(3, date(2025, 3, 1), date(2025, 3, 1));
        let err = same_day.validate().unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_matches_car_and_start_date() {
        let new = NewReservation::new(3, date(2025, 3, 1), date(2025, 3, 4));
        let existing = Reservation::from_value(&json!({
            "id": 5, "carId": 3, "startDate": "2025-03-01"
        }))
        .unwrap();
        let other = Reservation::from_value(&json!({
            "id": 6, "carId": 3, "startDate": "2025-04-01"
        }))
        .unwrap();

        assert!(new.matches(&existing));
        assert!(!new.matches(&other));
    }
}
