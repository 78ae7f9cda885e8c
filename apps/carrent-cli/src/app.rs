//! Wiring of the client over the concrete adapters.

use std::sync::Arc;

use anyhow::Context;

use carrent_core::{CarRentalClient, Gateway, Session};
use carrent_infra::{
    FileTokenStore, JwtTokenInspector, RecordingNavigator, ReqwestTransport, TransportConfig,
};

use crate::config::AppConfig;

/// Everything a command needs.
pub struct App {
    pub client: CarRentalClient,
    pub navigator: Arc<RecordingNavigator>,
    pub config: AppConfig,
}

impl App {
    pub fn build(config: AppConfig) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::with_config(&TransportConfig {
            timeout: config.http_timeout,
            accept_invalid_certs: config.accept_invalid_certs,
        })
        .context("failed to build the HTTP client")?;

        let store = FileTokenStore::new(&config.token_file);
        let navigator = Arc::new(RecordingNavigator::new());

        let gateway = Gateway::new(
            config.gateway.clone(),
            Session::new(Arc::new(store)),
            Arc::new(transport),
            navigator.clone(),
        );

        let client = CarRentalClient::new(Arc::new(gateway))
            .with_inspector(Arc::new(JwtTokenInspector::new()))
            .with_payment_urls(config.payment_urls.clone());

        tracing::debug!(
            api = %config.gateway.base_url,
            token_file = %config.token_file.display(),
            "Client ready"
        );

        Ok(Self {
            client,
            navigator,
            config,
        })
    }

    /// Whether this run ended up sending the user to sign in.
    pub fn needs_login(&self) -> bool {
        self.navigator.last().as_deref() == Some(self.config.gateway.login_location.as_str())
    }
}
