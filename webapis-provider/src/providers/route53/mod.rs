//! AWS Route53 client
//!
//! Route53 speaks REST-XML and authenticates with AWS Signature Version 4.
//! Responses are converted to JSON in the listing shape of the API so callers
//! never see XML.

mod error;
mod http;
mod provider;
mod sign;
mod xml;

use reqwest::Client;

use crate::config::{HttpConfig, Route53Config};
use crate::error::Result;
use crate::providers::common::create_http_client;

/// Signing service name.
pub(crate) const SERVICE: &str = "route53";

/// AWS Route53 client.
///
/// # Construction
///
/// ```rust,no_run
/// use webapis_provider::Route53Client;
///
/// let client = Route53Client::builder("AKIDEXAMPLE", "secret")
///     .session_token(None)
///     .build()?;
/// # Ok::<(), webapis_provider::ProviderError>(())
/// ```
pub struct Route53Client {
    pub(crate) client: Client,
    pub(crate) access_key_id: String,
    pub(crate) secret_access_key: String,
    pub(crate) session_token: Option<String>,
    pub(crate) config: Route53Config,
}

/// Builder for [`Route53Client`].
pub struct Route53ClientBuilder {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
    config: Route53Config,
    http: HttpConfig,
}

impl Route53ClientBuilder {
    /// STS session token for temporary credentials.
    pub fn session_token(mut self, token: Option<String>) -> Self {
        self.session_token = token;
        self
    }

    /// Endpoint, region and paging settings.
    pub fn config(mut self, config: Route53Config) -> Self {
        self.config = config;
        self
    }

    /// HTTP timeouts.
    pub fn http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Build the [`Route53Client`].
    pub fn build(self) -> Result<Route53Client> {
        Ok(Route53Client {
            client: create_http_client(&self.http, SERVICE)?,
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            session_token: self.session_token,
            config: self.config,
        })
    }
}

impl Route53Client {
    /// Returns a builder with default endpoint and timeouts.
    pub fn builder(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Route53ClientBuilder {
        Route53ClientBuilder {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            config: Route53Config::default(),
            http: HttpConfig::default(),
        }
    }
}
