//! # Carrent Shared
//!
//! Wire types shared between the client and the rental API.
//! Request bodies live in [`dto`], the server's error envelope in [`response`].

pub mod dto;
pub mod response;

pub use response::ProblemDetails;
