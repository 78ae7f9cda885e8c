//! Session token inspection.

mod jwt;

pub use jwt::JwtTokenInspector;
