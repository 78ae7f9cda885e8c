//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Semaphore;

use carrent_core::ports::{HttpBody, HttpRequest, HttpResponse, HttpTransport, TransportError};
use carrent_core::{CarRentalClient, Gateway, GatewayConfig, Session};
use carrent_infra::{InMemoryTokenStore, RecordingNavigator};

pub const BASE_URL: &str = "http://localhost:5000/api";
pub const LOGIN_PAGE: &str = "/pages/login/login.html";

/// Transport replaying scripted responses and recording requests.
#[derive(Default)]
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    fallback: Mutex<Option<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl ScriptedTransport {
    pub fn push(&self, status: u16, body: &str) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn push_error(&self, error: TransportError) {
        self.queue.lock().unwrap().push_back(Err(error));
    }

    /// Response used once the queue is drained.
    pub fn respond_always(&self, status: u16, body: &str) {
        *self.fallback.lock().unwrap() = Some(HttpResponse::new(status, body));
    }

    /// Hold every response until a permit is added to the returned semaphore.
    pub fn hold_responses(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }

        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None => self
                .fallback
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| TransportError::Other("no scripted response".to_string())),
        }
    }
}

pub fn json_body(request: &HttpRequest) -> Option<Value> {
    match &request.body {
        HttpBody::Text(text) => serde_json::from_str(text).ok(),
        _ => None,
    }
}

pub struct TestClient {
    pub client: CarRentalClient,
    pub transport: Arc<ScriptedTransport>,
    pub navigator: Arc<RecordingNavigator>,
    pub store: Arc<InMemoryTokenStore>,
}

impl TestClient {
    pub fn gateway(&self) -> &Gateway {
        self.client.gateway()
    }
}

/// Client wired to in-memory adapters, with `base_url` as API root.
pub fn client_with_base(base_url: &str) -> TestClient {
    let transport = Arc::new(ScriptedTransport::default());
    let navigator = Arc::new(RecordingNavigator::new());
    let store = Arc::new(InMemoryTokenStore::new());

    let gateway = Gateway::new(
        GatewayConfig {
            base_url: base_url.to_string(),
            login_location: LOGIN_PAGE.to_string(),
        },
        Session::new(store.clone()),
        transport.clone(),
        navigator.clone(),
    );

    TestClient {
        client: CarRentalClient::new(Arc::new(gateway)),
        transport,
        navigator,
        store,
    }
}

pub fn client() -> TestClient {
    client_with_base(BASE_URL)
}
