//! Authorized JSON requests against the Google REST APIs.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::http_client::{self, RawResponse, Retry};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::types::GoogleApiCall;

use super::GoogleClient;
use super::types::ErrorResponse;

impl GoogleClient {
    /// Map a non-2xx status and body to a [`ProviderError`].
    pub(crate) fn response_error(&self, status: u16, body: &str, ctx: ErrorContext) -> ProviderError {
        if let Ok(resp) = serde_json::from_str::<ErrorResponse>(body) {
            return self.map_error(
                RawApiError::with_code(resp.error.most_specific_code(), resp.error.message),
                ctx,
            );
        }
        self.map_error(
            RawApiError::with_code(status.to_string(), format!("HTTP {status}")),
            ctx,
        )
    }

    fn decode<T: DeserializeOwned>(&self, response: &RawResponse, ctx: &ErrorContext) -> Result<T> {
        if !response.is_success() {
            return Err(self.response_error(response.status, &response.body, ctx.clone()));
        }
        // `sites.add` answers with an empty body
        if response.body.trim().is_empty() {
            return serde_json::from_value(Value::Null).map_err(|e| self.parse_error(e));
        }
        http_client::parse_json(&response.body, self.provider_name())
    }

    /// Authorized GET with retries; parses the body as `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        ctx: ErrorContext,
    ) -> Result<T> {
        let request = self.client.get(url).bearer_auth(self.bearer().await?).query(query);
        http_client::send(
            request,
            self.provider_name(),
            url,
            Retry::UpTo(self.config.max_retries),
            |response| self.decode(&response, &ctx),
        )
        .await
    }

    /// Send one call outside a batch, once. Empty bodies become `null`.
    pub(crate) async fn send_call(&self, call: &GoogleApiCall) -> Result<Value> {
        let url = self.api_url(call.api, &call.path);
        let mut request = self
            .client
            .request(call.method.clone(), &url)
            .bearer_auth(self.bearer().await?);
        request = match &call.body {
            Some(body) => request.json(body),
            None => request.header(reqwest::header::CONTENT_LENGTH, 0),
        };

        let ctx = ErrorContext::resource(call.path.clone());
        http_client::send(request, self.provider_name(), &url, Retry::Never, |response| {
            self.decode(&response, &ctx)
        })
        .await
    }

    pub(crate) fn serialization_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }
}
