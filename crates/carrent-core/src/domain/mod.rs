//! Domain entities - the backend's records as the client sees them.
//!
//! Each entity is built from a raw JSON value through the tolerant
//! decoding helpers in [`crate::decode`].

mod car;
mod notification;
mod payment;
mod report;
mod reservation;
mod user;

pub use car::{Car, CarForm, CarStatus, ImageUpload};
pub use notification::{Notification, unread_count};
pub use payment::{Checkout, CheckoutSession, PaymentReturn, PaymentState, PaymentVerification};
pub use report::{GeneralStats, RevenuePoint, TopCar, revenue_series};
pub use reservation::{NewReservation, Reservation};
pub use user::CurrentUser;
