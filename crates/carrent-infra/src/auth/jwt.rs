//! JWT claim reader.
//!
//! Tokens are issued by an ASP.NET backend, which spells its claims as
//! schema URIs. The signature is not checked: the client only uses the
//! claims to decide what to show, and the backend re-validates every call.

use std::collections::HashSet;

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde_json::Value;

use carrent_core::ports::{AuthError, TokenClaims, TokenInspector};

const ROLE_CLAIMS: &[&str] = &[
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
    "role",
    "roles",
];
const NAME_CLAIMS: &[&str] = &[
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name",
    "name",
    "unique_name",
];
const EMAIL_CLAIMS: &[&str] = &[
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress",
    "email",
];
const SUBJECT_CLAIMS: &[&str] = &[
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier",
    "sub",
    "nameid",
];

/// Reads claims from a bearer JWT without verifying it.
pub struct JwtTokenInspector {
    validation: Validation,
    key: DecodingKey,
}

impl JwtTokenInspector {
    pub fn new() -> Self {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            validation,
            key: DecodingKey::from_secret(&[]),
        }
    }
}

impl Default for JwtTokenInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenInspector for JwtTokenInspector {
    fn inspect(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let data = decode::<Value>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let claims = data.claims;

        Ok(TokenClaims {
            subject: claim_str(&claims, SUBJECT_CLAIMS),
            email: claim_str(&claims, EMAIL_CLAIMS),
            name: claim_str(&claims, NAME_CLAIMS),
            roles: claim_roles(&claims),
            exp: claims.get("exp").and_then(Value::as_i64),
        })
    }
}

fn claim_str(claims: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| claims.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

/// The first role claim present, as a single string or a list.
fn claim_roles(claims: &Value) -> Vec<String> {
    let Some(value) = ROLE_CLAIMS.iter().find_map(|key| claims.get(*key)) else {
        return Vec::new();
    };

    match value {
        Value::String(role) => vec![role.clone()],
        Value::Array(roles) => roles
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    use super::*;

    fn token(claims: Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"backend-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_reads_aspnet_role_claim() {
        let jwt = token(json!({
            "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier": "42",
            "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress": "admin@rent.io",
            "http://schemas.microsoft.com/ws/2008/06/identity/claims/role": "Admin",
            "exp": 1,
            "aud": "carrent"
        }));

        let claims = JwtTokenInspector::new().inspect(&jwt).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("42"));
        assert_eq!(claims.email.as_deref(), Some("admin@rent.io"));
        assert_eq!(claims.roles, vec!["Admin".to_string()]);
        assert_eq!(claims.exp, Some(1));
    }

    #[test]
    fn test_reads_plain_role_list() {
        let jwt = token(json!({ "sub": 7, "name": "Sara", "roles": ["User", "Admin"] }));

        let claims = JwtTokenInspector::new().inspect(&jwt).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("7"));
        assert_eq!(claims.name.as_deref(), Some("Sara"));
        assert_eq!(claims.roles.len(), 2);
    }

    #[test]
    fn test_rejects_garbage() {
        let inspector = JwtTokenInspector::new();
        assert!(matches!(inspector.inspect(""), Err(AuthError::MissingToken)));
        assert!(matches!(
            inspector.inspect("not-a-token"),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
