//! Token inspection port.

/// Claims read out of a session token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenClaims {
    pub subject: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub roles: Vec<String>,
    pub exp: Option<i64>,
}

/// Reads the claims of a bearer token.
///
/// The client never verifies signatures; the backend remains the authority.
/// Claims are only used to decide what to show.
pub trait TokenInspector: Send + Sync {
    fn inspect(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing token")]
    MissingToken,
}
