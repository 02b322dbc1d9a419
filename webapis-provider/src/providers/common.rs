//! Helpers shared by the vendor clients.

use std::time::Duration;

use reqwest::Client;

use crate::config::HttpConfig;
use crate::error::{ProviderError, Result};

// ============ HTTP Client ============

/// Create an HTTP client with the configured timeouts.
pub fn create_http_client(config: &HttpConfig, provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(concat!("webapis/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// Join a base URL and a path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
