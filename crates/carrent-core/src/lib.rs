//! # Carrent Core
//!
//! Client-side core of the car-rental application.
//! Everything that talks to the outside world goes through the traits in
//! [`ports`]; this crate carries no infrastructure dependencies.
//!
//! - [`Session`] owns the bearer token lifecycle.
//! - [`Gateway`] is the single choke point for HTTP calls to the backend.
//! - [`NotificationPoller`] keeps a callback fed with the notification list.
//! - [`api`] wraps each backend endpoint in a typed call.

pub mod api;
pub mod decode;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod poller;
pub mod ports;
pub mod session;

#[cfg(test)]
mod testing;

pub use api::CarRentalClient;
pub use error::{ApiError, ApiResult};
pub use gateway::{Gateway, GatewayConfig, Payload, RequestBody, RequestOptions};
pub use poller::{NotificationPoller, PollerConfig};
pub use session::Session;
