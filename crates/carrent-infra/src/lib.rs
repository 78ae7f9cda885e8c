//! # Carrent Infrastructure
//!
//! Concrete implementations of the ports defined in `carrent-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory stores and timers only
//! - `http` - HTTP transport via reqwest
//! - `auth` - Session token inspection via jsonwebtoken

pub mod navigation;
pub mod session;
pub mod timer;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "auth")]
pub mod auth;

pub use navigation::RecordingNavigator;
pub use session::{FileTokenStore, InMemoryTokenStore};
pub use timer::{ManualTicker, TokioTicker};

#[cfg(feature = "http")]
pub use http::{ReqwestTransport, TransportConfig};

#[cfg(feature = "auth")]
pub use auth::JwtTokenInspector;
