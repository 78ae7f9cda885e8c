use serde::Serialize;

use crate::ports::TokenClaims;

/// Role that unlocks fleet management and reports.
pub const ADMIN_ROLE: &str = "Admin";

/// The signed-in user, as described by the session token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentUser {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub roles: Vec<String>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }
}

impl From<TokenClaims> for CurrentUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            id: claims.subject,
            email: claims.email,
            name: claims.name,
            roles: claims.roles,
        }
    }
}
