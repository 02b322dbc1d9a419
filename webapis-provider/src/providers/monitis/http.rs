//! Monitis request plumbing.
//!
//! Every action goes to the same endpoint; reads are GETs with the action in
//! the query string, writes are form-encoded POSTs.

use serde_json::Value;

use crate::error::Result;
use crate::http_client::{self, RawResponse, Retry};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::MonitisClient;

/// Timestamp format expected by write actions (GMT).
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append the per-monitor `domain` parameter to the configured parameters.
pub(crate) fn monitor_params(base: &str, url: &str) -> String {
    let base = base.trim().trim_end_matches(';');
    let domain = format!("domain:Domain:{url}:1:false:false");
    if base.is_empty() {
        domain
    } else {
        format!("{base};{domain}")
    }
}

/// Error text carried by a response body, if any.
///
/// Failures come back as `{"error": "..."}` or as a `status` other than `ok`.
pub(crate) fn body_error(body: &Value) -> Option<String> {
    if let Some(error) = body.get("error") {
        return Some(match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
    }
    match body.get("status").and_then(Value::as_str) {
        Some(status) if !status.eq_ignore_ascii_case("ok") => Some(status.to_string()),
        _ => None,
    }
}

impl MonitisClient {
    /// Monitis reports most failures in a 200 body; both those and non-2xx
    /// statuses become vendor errors.
    fn decode(&self, response: RawResponse, ctx: &ErrorContext) -> Result<Value> {
        if !response.is_success() {
            let message = serde_json::from_str::<Value>(&response.body)
                .ok()
                .as_ref()
                .and_then(body_error)
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            return Err(self.map_error(
                RawApiError::with_code(response.status.to_string(), message),
                ctx.clone(),
            ));
        }

        let body: Value = http_client::parse_json(&response.body, self.provider_name())?;
        match body_error(&body) {
            Some(message) => Err(self.map_error(RawApiError::new(message), ctx.clone())),
            None => Ok(body),
        }
    }

    /// GET a read action, with retries.
    pub(crate) async fn get_action(&self, action: &str, params: &[(&str, String)]) -> Result<Value> {
        let mut query: Vec<(&str, String)> = vec![
            ("action", action.to_string()),
            ("apikey", self.api_key.clone()),
            ("version", self.config.api_version.clone()),
            ("output", "json".to_string()),
        ];
        query.extend(params.iter().cloned());

        let request = self.client.get(&self.config.api_url).query(&query);
        let ctx = ErrorContext::default();
        http_client::send(
            request,
            self.provider_name(),
            action,
            Retry::UpTo(self.config.max_retries),
            |response| self.decode(response, &ctx),
        )
        .await
    }

    /// POST a write action as a form, once.
    pub(crate) async fn post_action(&self, form: &[(&str, String)], ctx: ErrorContext) -> Result<Value> {
        let request = self.client.post(&self.config.api_url).form(form);
        let action = form
            .iter()
            .find(|(k, _)| *k == "action")
            .map_or("POST", |(_, v)| v.as_str());
        http_client::send(request, self.provider_name(), action, Retry::Never, |response| {
            self.decode(response, &ctx)
        })
        .await
    }
}
