//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod navigator;
mod ticker;
mod token_store;
mod transport;

pub use auth::{AuthError, TokenClaims, TokenInspector};
pub use navigator::Navigator;
pub use ticker::{TickFuture, TickHandle, TickTask, Ticker};
pub use token_store::{StoreError, TokenStore};
pub use transport::{
    FormPart, HttpBody, HttpRequest, HttpResponse, HttpTransport, Method, MultipartForm,
    TransportError,
};
