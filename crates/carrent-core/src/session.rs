//! Session token lifecycle.

use std::sync::Arc;

use crate::ports::TokenStore;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "jwt_token";

/// Owns the bearer token.
///
/// Storage failures never surface to callers: a failed read means "no
/// token", a failed write or delete is logged and otherwise ignored.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Current token, if any.
    pub fn get_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Persist `token`, replacing any previous one.
    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.store.set(TOKEN_KEY, token) {
            tracing::warn!(error = %e, "Failed to persist session token");
        }
    }

    /// Forget the current token.
    pub fn clear_token(&self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "Failed to clear session token");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }
}
