use std::sync::Arc;

use carrent_shared::dto::{LoginRequest, RegisterRequest};
use serde::Serialize;
use serde_json::Value;

use crate::decode::{self, TOKEN_KEYS};
use crate::domain::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::gateway::{Gateway, Payload, RequestOptions};
use crate::ports::{Method, TokenInspector};

/// Where non-admins are sent when they reach an admin-only operation.
pub const HOME_LOCATION: &str = "/index.html";

/// Bare-string login responses shorter than this are not taken as tokens.
const MIN_BARE_TOKEN_LEN: usize = 10;

/// Outcome of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub raw: Value,
}

/// `/Auth/*` endpoints and the local view of the session.
pub struct AuthApi {
    gateway: Arc<Gateway>,
    inspector: Option<Arc<dyn TokenInspector>>,
}

impl AuthApi {
    pub fn new(gateway: Arc<Gateway>, inspector: Option<Arc<dyn TokenInspector>>) -> Self {
        Self { gateway, inspector }
    }

    /// Exchange credentials for a token and persist it.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginOutcome> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::InvalidInput(
                "Please enter your email and password".to_string(),
            ));
        }
        if !looks_like_email(email) {
            return Err(ApiError::InvalidInput(
                "Please enter a valid email address".to_string(),
            ));
        }

        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let payload = self
            .gateway
            .request("/Auth/login", RequestOptions::new(Method::Post).json(to_json(&body)?))
            .await?;

        let token = extract_token(&payload).ok_or_else(|| {
            ApiError::UnexpectedResponse("login response did not provide a token".to_string())
        })?;

        self.gateway.session().set_token(&token);
        tracing::info!("Signed in");

        Ok(LoginOutcome {
            token,
            raw: payload.into_value(),
        })
    }

    /// Create an account. The user still has to log in afterwards.
    pub async fn register(&self, full_name: &str, email: &str, password: &str) -> ApiResult<Payload> {
        let full_name = full_name.trim();
        let email = email.trim();

        if full_name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ApiError::InvalidInput("Please fill in all fields".to_string()));
        }
        if full_name.chars().count() < 2 {
            return Err(ApiError::InvalidInput(
                "Full name must be at least 2 characters".to_string(),
            ));
        }
        if !looks_like_email(email) {
            return Err(ApiError::InvalidInput(
                "Please enter a valid email address".to_string(),
            ));
        }
        if password.chars().count() < 6 {
            return Err(ApiError::InvalidInput(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        let body = RegisterRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.gateway
            .request(
                "/Auth/register",
                RequestOptions::new(Method::Post).json(to_json(&body)?),
            )
            .await
    }

    /// Drop the local session. The backend keeps no session state to end.
    pub fn logout(&self) {
        self.gateway.session().clear_token();
        tracing::info!("Signed out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.gateway.session().is_authenticated()
    }

    /// The user described by the stored token, if it can be read.
    pub fn current_user(&self) -> Option<CurrentUser> {
        let token = self.gateway.session().get_token()?;
        let inspector = self.inspector.as_ref()?;

        match inspector.inspect(&token) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                tracing::debug!(error = %e, "Stored token could not be decoded");
                None
            }
        }
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|u| u.is_admin())
    }

    /// Guard for operations that need a session.
    ///
    /// Without a token the user is sent to the login entry point and the
    /// call fails as unauthorized.
    pub fn require_authenticated(&self) -> ApiResult<()> {
        if self.is_authenticated() {
            return Ok(());
        }
        tracing::info!("Not signed in");
        self.gateway.redirect(self.gateway.login_location());
        Err(ApiError::Unauthorized)
    }

    /// Guard for admin-only operations.
    ///
    /// Signed-out users get the login redirect of
    /// [`require_authenticated`](Self::require_authenticated); signed-in
    /// users without the admin role are sent home.
    pub fn require_admin(&self) -> ApiResult<()> {
        self.require_authenticated()?;
        if self.is_admin() {
            return Ok(());
        }
        tracing::info!("Admin role required");
        self.gateway.redirect(HOME_LOCATION);
        Err(ApiError::Forbidden("Admin access required".to_string()))
    }
}

/// Token from `{token}`, `{accessToken}`, `{data: {token}}` or a bare string body.
fn extract_token(payload: &Payload) -> Option<String> {
    match payload {
        Payload::Json(Value::String(s)) | Payload::Text(s) => {
            let s = s.trim().trim_matches('"');
            (s.len() > MIN_BARE_TOKEN_LEN).then(|| s.to_string())
        }
        Payload::Json(value) => decode::pick_str(value, TOKEN_KEYS),
        Payload::Empty => None,
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

fn to_json<T: Serialize>(body: &T) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::InvalidInput(e.to_string()))
}
