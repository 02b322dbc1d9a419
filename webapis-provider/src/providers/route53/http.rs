//! Signed GET requests against the Route53 REST API.

use std::time::SystemTime;

use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::http_client::{self, RawResponse, Retry};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Route53Client;
use super::sign::query_string;
use super::xml;

impl Route53Client {
    /// `host[:port]` of the endpoint, as sent in the `Host` header.
    fn host(&self) -> Result<String> {
        let url = reqwest::Url::parse(&self.config.endpoint).map_err(|e| {
            ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "endpoint".to_string(),
                detail: e.to_string(),
            }
        })?;
        let host = url.host_str().unwrap_or_default();
        Ok(match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }

    /// The `root` element of a 2xx body as JSON, or the vendor error of any
    /// other status.
    fn decode(&self, response: RawResponse, root: &str, ctx: &ErrorContext) -> Result<Value> {
        if response.is_success() {
            return xml::parse_response(&response.body, root).map_err(|e| self.parse_error(e));
        }

        let ctx = ErrorContext {
            retry_after: response.retry_after,
            ..ctx.clone()
        };
        Err(match xml::parse_error(&response.body) {
            Some((code, message)) => self.map_error(RawApiError::with_code(code, message), ctx),
            None => self.unknown_error(RawApiError::with_code(
                response.status.to_string(),
                format!("HTTP {}", response.status),
            )),
        })
    }

    /// Signed GET of `/{api_version}/{path}`; returns the unwrapped `root` element as JSON.
    pub(crate) async fn get(
        &self,
        path: &str,
        params: &[(String, String)],
        root: &str,
        ctx: ErrorContext,
    ) -> Result<Value> {
        let host = self.host()?;
        let path = format!("/{}/{}", self.config.api_version, path);
        let query = query_string(params);
        let path_and_query = if query.is_empty() {
            path
        } else {
            format!("{path}?{query}")
        };
        let url = format!("{}{path_and_query}", self.config.endpoint.trim_end_matches('/'));

        let mut request = self.client.get(&url);
        for (name, value) in self.signing_headers("GET", &host, &path_and_query, SystemTime::now())? {
            request = request.header(name, value);
        }

        http_client::send(
            request,
            self.provider_name(),
            &url,
            Retry::UpTo(self.config.max_retries),
            |response| self.decode(response, root, &ctx),
        )
        .await
    }
}
