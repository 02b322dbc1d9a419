//! Monitis custom monitor API client
//!
//! Requests authenticate with an API key plus a short-lived auth token
//! obtained from the API key and secret key.

mod error;
mod http;
mod provider;

use reqwest::Client;

use crate::config::{HttpConfig, MonitisConfig};
use crate::error::Result;
use crate::providers::common::create_http_client;

/// Monitis API client.
///
/// # Construction
///
/// ```rust,no_run
/// use webapis_provider::MonitisClient;
///
/// let client = MonitisClient::builder("api-key", "secret-key").build()?;
/// # Ok::<(), webapis_provider::ProviderError>(())
/// ```
pub struct MonitisClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) secret_key: String,
    pub(crate) config: MonitisConfig,
}

/// Builder for [`MonitisClient`].
pub struct MonitisClientBuilder {
    api_key: String,
    secret_key: String,
    config: MonitisConfig,
    http: HttpConfig,
}

impl MonitisClientBuilder {
    /// Endpoint, actions and monitor defaults.
    pub fn config(mut self, config: MonitisConfig) -> Self {
        self.config = config;
        self
    }

    /// HTTP timeouts.
    pub fn http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Build the [`MonitisClient`].
    pub fn build(self) -> Result<MonitisClient> {
        Ok(MonitisClient {
            client: create_http_client(&self.http, "monitis")?,
            api_key: self.api_key,
            secret_key: self.secret_key,
            config: self.config,
        })
    }
}

impl MonitisClient {
    /// Returns a builder with the public endpoint and default monitor settings.
    pub fn builder(api_key: impl Into<String>, secret_key: impl Into<String>) -> MonitisClientBuilder {
        MonitisClientBuilder {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            config: MonitisConfig::default(),
            http: HttpConfig::default(),
        }
    }

    /// Default group list for monitors created without one.
    pub fn default_tag(&self) -> &str {
        &self.config.monitor.default_tag
    }
}
