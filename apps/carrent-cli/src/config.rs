//! Client configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use carrent_core::GatewayConfig;
use carrent_core::api::PaymentUrls;

const DEFAULT_POLL_SECS: u64 = 10;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub token_file: PathBuf,
    pub payment_urls: PaymentUrls,
    pub poll_interval: Duration,
    pub http_timeout: Option<Duration>,
    pub accept_invalid_certs: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = GatewayConfig::default();
        let payment_defaults = PaymentUrls::default();

        Self {
            gateway: GatewayConfig {
                base_url: var("CARRENT_API_URL").unwrap_or(defaults.base_url),
                login_location: var("CARRENT_LOGIN_URL").unwrap_or(defaults.login_location),
            },
            token_file: var("CARRENT_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(default_token_file),
            payment_urls: PaymentUrls {
                success_url: var("CARRENT_PAYMENT_SUCCESS_URL")
                    .unwrap_or(payment_defaults.success_url),
                cancel_url: var("CARRENT_PAYMENT_CANCEL_URL")
                    .unwrap_or(payment_defaults.cancel_url),
            },
            poll_interval: Duration::from_secs(
                var("CARRENT_POLL_INTERVAL_SECS")
                    .and_then(|s| s.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_POLL_SECS),
            ),
            http_timeout: var("CARRENT_HTTP_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            accept_invalid_certs: var("CARRENT_ACCEPT_INVALID_CERTS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// `<config dir>/carrent/session.json`, or the working directory when the
/// platform has no config dir.
fn default_token_file() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("carrent"))
        .unwrap_or_default()
        .join("session.json")
}
