//! Google APIs client (Analytics, Search Console, Tag Manager)
//!
//! All three APIs share one bearer token and one host, so a single client
//! serves them. Writes go through the per-API batch endpoint.

mod auth;
mod batch;
mod error;
mod http;
mod provider;
/// Google API-specific response types.
pub(crate) mod types;

use reqwest::Client;
use tokio::sync::OnceCell;

use crate::config::{GoogleConfig, GoogleServiceConfig, HttpConfig};
use crate::error::Result;
use crate::providers::common::{create_http_client, join_url};
use crate::types::{GoogleApi, GoogleAuth};

/// Google APIs client.
///
/// # Construction
///
/// ```rust,no_run
/// use webapis_provider::GoogleClient;
///
/// let client = GoogleClient::builder("ya29.token").build()?;
/// // or, minting access tokens from a refresh token:
/// let client = GoogleClient::builder(webapis_provider::GoogleAuth::RefreshToken {
///     client_id: "123.apps.googleusercontent.com".to_string(),
///     client_secret: "secret".to_string(),
///     refresh_token: "1//refresh".to_string(),
///     token_uri: webapis_provider::GOOGLE_TOKEN_URI.to_string(),
/// })
/// .build()?;
/// # Ok::<(), webapis_provider::ProviderError>(())
/// ```
pub struct GoogleClient {
    pub(crate) client: Client,
    pub(crate) auth: GoogleAuth,
    /// Bearer token, resolved on first use.
    pub(crate) token: OnceCell<String>,
    pub(crate) config: GoogleConfig,
}

/// Builder for [`GoogleClient`].
pub struct GoogleClientBuilder {
    auth: GoogleAuth,
    config: GoogleConfig,
    http: HttpConfig,
}

impl GoogleClientBuilder {
    /// API names, versions, endpoints and batch size.
    pub fn config(mut self, config: GoogleConfig) -> Self {
        self.config = config;
        self
    }

    /// HTTP timeouts.
    pub fn http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Build the [`GoogleClient`].
    pub fn build(self) -> Result<GoogleClient> {
        Ok(GoogleClient {
            client: create_http_client(&self.http, "google")?,
            auth: self.auth,
            token: OnceCell::new(),
            config: self.config,
        })
    }
}

impl GoogleClient {
    /// Returns a builder with the public endpoints.
    pub fn builder(auth: impl Into<GoogleAuth>) -> GoogleClientBuilder {
        GoogleClientBuilder {
            auth: auth.into(),
            config: GoogleConfig::default(),
            http: HttpConfig::default(),
        }
    }

    pub(crate) fn service(&self, api: GoogleApi) -> &GoogleServiceConfig {
        match api {
            GoogleApi::Analytics => &self.config.analytics,
            GoogleApi::SearchConsole => &self.config.search_console,
            GoogleApi::TagManager => &self.config.tag_manager,
        }
    }

    /// `/{api_name}/{version}/{path}`, the path as written in batch parts.
    pub(crate) fn api_path(&self, api: GoogleApi, path: &str) -> String {
        let service = self.service(api);
        format!(
            "/{}/{}/{}",
            service.api_name,
            service.api_version,
            path.trim_start_matches('/')
        )
    }

    /// Absolute URL of `path` under `api`.
    pub(crate) fn api_url(&self, api: GoogleApi, path: &str) -> String {
        join_url(&self.config.base_url, &self.api_path(api, path))
    }

    /// Batch endpoint of `api`.
    pub(crate) fn batch_url(&self, api: GoogleApi) -> String {
        let service = self.service(api);
        join_url(
            &self.config.base_url,
            &format!("batch/{}/{}", service.api_name, service.api_version),
        )
    }
}
