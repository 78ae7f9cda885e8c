//! Session & request gateway.
//!
//! Every call to the backend passes through [`Gateway::request`] or
//! [`Gateway::send_multipart`], so token attachment, session invalidation and
//! error normalization happen the same way for every page of the client.

use std::sync::Arc;

use carrent_shared::ProblemDetails;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::decode::{self, MESSAGE_KEYS};
use crate::error::{ApiError, ApiResult};
use crate::ports::{HttpBody, HttpRequest, HttpTransport, Method, MultipartForm, Navigator};
use crate::session::Session;

/// Fallback message when a failed response says nothing useful.
const GENERIC_FAILURE: &str = "Request failed";

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,
    /// Where the user is sent when the backend rejects the session.
    pub login_location: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:44385/api".to_string(),
            login_location: "/pages/login/login.html".to_string(),
        }
    }
}

/// Body handed to [`Gateway::request`].
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured value, sent as JSON.
    Json(Value),
    /// Opaque multipart payload, sent untouched.
    Form(MultipartForm),
}

/// Per-call request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn form(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Form(form));
        self
    }
}

/// Decoded body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The response had no body.
    Empty,
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not JSON; kept verbatim.
    Text(String),
}

impl Payload {
    /// The payload as a JSON value. `Empty` maps to `null`, text to a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Empty => Value::Null,
            Payload::Json(value) => value,
            Payload::Text(text) => Value::String(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty | Payload::Json(Value::Null))
    }

    /// Deserialize the payload into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        serde_json::from_value(self.into_value())
            .map_err(|e| ApiError::UnexpectedResponse(e.to_string()))
    }

    /// Deserialize a list payload; an empty response is an empty list.
    pub fn into_list<T: DeserializeOwned>(self) -> ApiResult<Vec<T>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        self.decode()
    }
}

/// Single choke point for backend calls.
pub struct Gateway {
    base_url: String,
    login_location: String,
    session: Session,
    transport: Arc<dyn HttpTransport>,
    navigator: Arc<dyn Navigator>,
}

impl Gateway {
    pub fn new(
        config: GatewayConfig,
        session: Session,
        transport: Arc<dyn HttpTransport>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let base_url = config
            .base_url
            .strip_suffix('/')
            .unwrap_or(&config.base_url)
            .to_string();

        Self {
            base_url,
            login_location: config.login_location,
            session,
            transport,
            navigator,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_location(&self) -> &str {
        &self.login_location
    }

    /// Send the user to `location` through the navigator.
    pub fn redirect(&self, location: &str) {
        self.navigator.navigate(location);
    }

    /// Absolute URL for `path`.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Issue a request and normalize the outcome.
    pub async fn request(&self, path: &str, options: RequestOptions) -> ApiResult<Payload> {
        let mut headers = options.headers;

        let body = match options.body {
            None => HttpBody::Empty,
            Some(RequestBody::Json(value)) => {
                let text = serde_json::to_string(&value)
                    .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
                set_header(&mut headers, "Content-Type", "application/json");
                HttpBody::Text(text)
            }
            Some(RequestBody::Form(form)) => HttpBody::Multipart(form),
        };

        self.dispatch(path, options.method, headers, body).await
    }

    /// Issue a multipart request (file uploads). No JSON handling, no content-type override.
    pub async fn send_multipart(
        &self,
        path: &str,
        method: Method,
        form: MultipartForm,
    ) -> ApiResult<Payload> {
        self.dispatch(path, method, Vec::new(), HttpBody::Multipart(form))
            .await
    }

    /// `GET path`, decoded into `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request(path, RequestOptions::default())
            .await?
            .decode()
    }

    /// Bodiless request with `method`, decoded into `T`.
    pub async fn send<T: DeserializeOwned>(&self, path: &str, method: Method) -> ApiResult<T> {
        self.request(path, RequestOptions::new(method))
            .await?
            .decode()
    }

    /// Send `body` as JSON, decode the response into `T`.
    pub async fn send_json<B, T>(&self, path: &str, method: Method, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        self.request(path, RequestOptions::new(method).json(value))
            .await?
            .decode()
    }

    async fn dispatch(
        &self,
        path: &str,
        method: Method,
        mut headers: Vec<(String, String)>,
        body: HttpBody,
    ) -> ApiResult<Payload> {
        if let Some(token) = self.session.get_token() {
            set_header(&mut headers, "Authorization", &format!("Bearer {}", token));
        }

        let request = HttpRequest {
            method,
            url: self.url_for(path),
            headers,
            body,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(%method, path, error = %e, "Request failed before a response");
                return Err(ApiError::Transport(e.to_string()));
            }
        };

        tracing::debug!(%method, path, status = response.status, "Response received");

        if response.status == 401 {
            self.invalidate_session();
            return Err(ApiError::Unauthorized);
        }

        if !response.is_success() {
            return Err(normalize_failure(response.status, &response.body));
        }

        Ok(parse_success(response.body))
    }

    /// Forget the token and send the user back to the login entry point.
    fn invalidate_session(&self) {
        tracing::info!(
            location = %self.login_location,
            "Session rejected by server, signing out"
        );
        self.session.clear_token();
        self.redirect(&self.login_location);
    }
}

/// Append `path` to `base`, inserting the separating slash when missing.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Append URL-encoded query parameters to `path`.
pub fn with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }

    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();

    format!("{}?{}", path, query)
}

/// Percent-encode one path segment.
pub fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    headers.push((name.to_string(), value.to_string()));
}

/// Interpret the body of a success response.
fn parse_success(body: String) -> Payload {
    if body.is_empty() {
        return Payload::Empty;
    }

    match serde_json::from_str(&body) {
        Ok(value) => Payload::Json(value),
        Err(_) => Payload::Text(body),
    }
}

/// Turn a failed response into an [`ApiError`].
///
/// Preference order for the message: field validation map, top-level
/// `message`, raw body text, generic text.
pub(crate) fn normalize_failure(status: u16, text: &str) -> ApiError {
    let raw: Option<Value> = if text.is_empty() {
        None
    } else {
        Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
    };

    let problem = raw
        .as_ref()
        .filter(|value| value.is_object())
        .and_then(|value| serde_json::from_value::<ProblemDetails>(value.clone()).ok());

    if let Some(problem) = &problem {
        if let (Some(message), Some(fields)) = (problem.validation_summary(), &problem.errors) {
            return ApiError::Validation {
                status,
                message,
                fields: fields.clone(),
                raw: raw.unwrap_or(Value::Null),
            };
        }
    }

    let message = problem
        .and_then(|p| p.message)
        .or_else(|| {
            raw.as_ref()
                .filter(|value| value.is_object())
                .and_then(|value| decode::pick_str(value, MESSAGE_KEYS))
        })
        .filter(|m| !m.is_empty())
        .or_else(|| (!text.is_empty()).then(|| text.to_string()))
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());

    ApiError::Status {
        status,
        message,
        raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Harness, LOGIN, status};

    #[test]
    fn test_join_url_prefixes_exactly_once() {
        let base = "https://api.example.com/api";
        assert_eq!(join_url(base, "/Car/all"), "https://api.example.com/api/Car/all");
        assert_eq!(join_url(base, "Car/all"), "https://api.example.com/api/Car/all");
    }

    #[test]
    fn test_with_query_encodes_values() {
        assert_eq!(
            with_query("/Report/top-cars", &[("take", 5.to_string())]),
            "/Report/top-cars?take=5"
        );
        assert_eq!(
            with_query("/Payment/verify", &[("reservationId", "a b&c".to_string())]),
            "/Payment/verify?reservationId=a+b%26c"
        );
        assert_eq!(with_query("/Car/all", &[]), "/Car/all");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("cs_test_123"), "cs_test_123");
        assert_eq!(encode_segment("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn test_parse_success_variants() {
        assert_eq!(parse_success(String::new()), Payload::Empty);
        assert_eq!(
            parse_success(r#"{"id":1}"#.to_string()),
            Payload::Json(serde_json::json!({ "id": 1 }))
        );
        assert_eq!(
            parse_success("Reservation cancelled".to_string()),
            Payload::Text("Reservation cancelled".to_string())
        );
    }

    #[test]
    fn test_normalize_validation_map() {
        let body = r#"{"title":"One or more validation errors occurred.","errors":{"EndDate":["End date must be after start date"],"CarId":["Required","Must be positive"]}}"#;

        let err = normalize_failure(400, body);
        assert_eq!(err.status(), 400);
        assert_eq!(
            err.to_string(),
            "CarId: Required, Must be positive\nEndDate: End date must be after start date"
        );
        assert_eq!(err.first_field_message(), Some("Required"));
        assert!(err.raw().unwrap().get("errors").is_some());
    }

    #[test]
    fn test_normalize_message_then_text_then_generic() {
        let err = normalize_failure(409, r#"{"message":"Car already reserved"}"#);
        assert_eq!(err.to_string(), "Car already reserved");

        let err = normalize_failure(500, "Internal Server Error");
        assert_eq!(err.to_string(), "Internal Server Error");
        assert_eq!(
            err.raw(),
            Some(&Value::String("Internal Server Error".to_string()))
        );

        let err = normalize_failure(404, "");
        assert_eq!(err.to_string(), GENERIC_FAILURE);
        assert!(err.raw().is_none());
    }

    #[test]
    fn test_normalize_survives_mistyped_fields() {
        let err = normalize_failure(409, r#"{"status":"error","message":"Car is not available"}"#);
        assert_eq!(err.status(), 409);
        assert_eq!(err.to_string(), "Car is not available");

        let err = normalize_failure(400, r#"{"errors":{"EndDate":["bad"]},"status":"Failed"}"#);
        assert_eq!(err.to_string(), "EndDate: bad");
        assert_eq!(err.first_field_message(), Some("bad"));
        assert!(err.field_errors().is_some());
    }

    #[tokio::test]
    async fn test_unauthorized_redirects_to_login() {
        let h = Harness::new();
        h.gateway.session().set_token("stale");
        h.transport.push(status(401, ""));

        let err = h
            .gateway
            .request("/Car/delete/3", RequestOptions::new(Method::Delete))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(!h.gateway.session().is_authenticated());
        assert_eq!(h.navigator.visited(), vec![LOGIN.to_string()]);
    }

    #[test]
    fn test_payload_into_list_treats_empty_as_empty() {
        let items: Vec<i32> = Payload::Empty.into_list().unwrap();
        assert!(items.is_empty());

        let items: Vec<i32> = Payload::Json(serde_json::json!([1, 2])).into_list().unwrap();
        assert_eq!(items, vec![1, 2]);

        let err = Payload::Text("nope".into()).into_list::<i32>().unwrap_err();
        assert_eq!(err.status(), 500);
    }
}
