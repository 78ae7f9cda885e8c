//! Client-level error types.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Message shown to the user when the backend could not be reached.
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the server. Check your connection and try again.";

/// Normalized failure of a backend call.
///
/// Every path through the gateway ends in either a payload or one of these;
/// callers have a single error shape to branch on whatever went wrong.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response at all (network unreachable, TLS failure, ...). Status 0.
    #[error("Failed to fetch: {0}")]
    Transport(String),

    /// The backend rejected the session. The token has already been cleared.
    #[error("Unauthorized")]
    Unauthorized,

    /// Signed in, but without the role the operation needs.
    #[error("{0}")]
    Forbidden(String),

    /// The backend rejected the input with a field-level error map.
    #[error("{message}")]
    Validation {
        status: u16,
        message: String,
        fields: BTreeMap<String, Vec<String>>,
        raw: Value,
    },

    /// Any other non-success status.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        raw: Option<Value>,
    },

    /// A success response whose payload did not have the expected shape.
    #[error("Invalid response from server: {0}")]
    UnexpectedResponse(String),

    /// Input rejected on the client before any request was made.
    #[error("{0}")]
    InvalidInput(String),
}

impl ApiError {
    /// HTTP status code carried by this failure (0 when nothing was received).
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Transport(_) => 0,
            ApiError::Unauthorized => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::Validation { status, .. } | ApiError::Status { status, .. } => *status,
            ApiError::UnexpectedResponse(_) => 500,
            ApiError::InvalidInput(_) => 400,
        }
    }

    /// Parsed error body, when the backend sent one.
    pub fn raw(&self) -> Option<&Value> {
        match self {
            ApiError::Validation { raw, .. } => Some(raw),
            ApiError::Status { raw, .. } => raw.as_ref(),
            _ => None,
        }
    }

    /// Field-level validation messages, empty for other failures.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            ApiError::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// First validation message, e.g. to show next to a form.
    pub fn first_field_message(&self) -> Option<&str> {
        self.field_errors()?
            .values()
            .flat_map(|messages| messages.iter())
            .map(String::as_str)
            .next()
    }

    /// Text to put in front of the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => CONNECTIVITY_MESSAGE.to_string(),
            ApiError::Validation { message, .. } => self
                .first_field_message()
                .map(str::to_string)
                .unwrap_or_else(|| message.clone()),
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Result type alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Transport("dns".into()).status(), 0);
        assert_eq!(ApiError::Unauthorized.status(), 401);
        assert_eq!(ApiError::InvalidInput("x".into()).status(), 400);
        assert_eq!(ApiError::Forbidden("x".into()).status(), 403);
        assert_eq!(ApiError::UnexpectedResponse("x".into()).status(), 500);
        let err = ApiError::Status {
            status: 503,
            message: "down".into(),
            raw: None,
        };
        assert_eq!(err.status(), 503);
    }

    #[test]
    fn test_user_message_prefers_first_field_message() {
        let mut fields = BTreeMap::new();
        fields.insert(
            "Email".to_string(),
            vec!["Email is taken".to_string(), "ignored".to_string()],
        );
        let err = ApiError::Validation {
            status: 400,
            message: "Email: Email is taken, ignored".into(),
            fields,
            raw: Value::Null,
        };

        assert_eq!(err.first_field_message(), Some("Email is taken"));
        assert_eq!(err.user_message(), "Email is taken");
    }

    #[test]
    fn test_transport_user_message_is_generic() {
        let err = ApiError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "Failed to fetch: connection refused");
        assert_eq!(err.user_message(), CONNECTIVITY_MESSAGE);
    }
}
