//! Test doubles shared by the unit tests of this crate.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::gateway::{Gateway, GatewayConfig};
use crate::ports::{
    HttpBody, HttpRequest, HttpResponse, HttpTransport, Navigator, StoreError, TokenStore,
    TransportError,
};
use crate::session::Session;

pub const BASE_URL: &str = "http://rental.test/api";
pub const LOGIN: &str = "/pages/login/login.html";

pub fn ok(body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(200, body))
}

pub fn status(code: u16, body: &str) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(code, body))
}

/// Replays queued responses and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn push(&self, response: Result<HttpResponse, TransportError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted response".into())))
    }
}

#[derive(Default)]
pub struct MemoryStore(Mutex<HashMap<String, String>>);

impl TokenStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.0.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.0.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNavigator(Mutex<Vec<String>>);

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, location: &str) {
        self.0.lock().unwrap().push(location.to_string());
    }
}

pub trait RequestExt {
    fn json_body(&self) -> Option<Value>;
}

impl RequestExt for HttpRequest {
    fn json_body(&self) -> Option<Value> {
        match &self.body {
            HttpBody::Text(text) => serde_json::from_str(text).ok(),
            _ => None,
        }
    }
}

pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub navigator: Arc<RecordingNavigator>,
    pub gateway: Arc<Gateway>,
}

impl Harness {
    pub fn new() -> Self {
        let transport = Arc::new(ScriptedTransport::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let gateway = Arc::new(Gateway::new(
            GatewayConfig {
                base_url: BASE_URL.to_string(),
                login_location: LOGIN.to_string(),
            },
            Session::new(Arc::new(MemoryStore::default())),
            transport.clone(),
            navigator.clone(),
        ));

        Self {
            transport,
            navigator,
            gateway,
        }
    }
}
