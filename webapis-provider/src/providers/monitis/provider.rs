//! `MonitisApi` and `BatchExecutor` for [`MonitisClient`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::traits::{BatchExecutor, ErrorContext, MonitisApi, ProviderErrorMapper};
use crate::types::AddMonitorRequest;
use crate::utils::log_sanitizer::mask_secret;

use super::MonitisClient;
use super::http::{TIMESTAMP_FORMAT, monitor_params};

#[async_trait]
impl MonitisApi for MonitisClient {
    async fn get_auth_token(&self) -> Result<String> {
        log::debug!("[monitis] Requesting auth token for key {}", mask_secret(&self.api_key));
        let body = self
            .get_action(
                &self.config.actions.get_auth_token,
                &[("secretkey", self.secret_key.clone())],
            )
            .await?;

        body.get("authToken")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| self.parse_error("response has no authToken"))
    }

    async fn add_rum_monitor(&self, request: &AddMonitorRequest) -> Result<Value> {
        let defaults = &self.config.monitor;
        let timestamp = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();

        let form: Vec<(&str, String)> = vec![
            ("apikey", self.api_key.clone()),
            ("validation", self.config.auth_method.clone()),
            ("authToken", request.auth_token.clone()),
            ("action", self.config.actions.add_rum.clone()),
            ("timestamp", timestamp),
            ("name", request.name.clone()),
            ("type", defaults.monitor_type.clone()),
            ("url", request.url.clone()),
            ("monitorParams", monitor_params(&defaults.monitor_params, &request.url)),
            ("resultParams", defaults.result_params.clone()),
            ("tag", request.tag.clone()),
            ("version", self.config.api_version.clone()),
            ("output", "json".to_string()),
            ("recordApiCall", "false".to_string()),
            ("fromDashboard", "true".to_string()),
        ];

        log::debug!("[monitis] Adding monitor {} for {}", request.name, request.url);
        self.post_action(&form, ErrorContext::resource(request.name.clone()))
            .await
    }

    async fn list_monitors(&self, auth_token: &str) -> Result<Value> {
        let body = self
            .get_action(
                &self.config.actions.get_monitors,
                &[
                    ("authToken", auth_token.to_string()),
                    ("type", self.config.monitor.monitor_type.clone()),
                ],
            )
            .await?;

        match body {
            Value::Array(_) => Ok(body),
            Value::Object(mut map) => match map.remove("data") {
                Some(data @ Value::Array(_)) => Ok(data),
                _ => Err(self.parse_error("monitor list is not an array")),
            },
            _ => Err(self.parse_error("monitor list is not an array")),
        }
    }
}

#[async_trait]
impl BatchExecutor for MonitisClient {
    type Call = AddMonitorRequest;

    async fn execute_call(&self, call: &AddMonitorRequest) -> Result<Value> {
        self.add_rum_monitor(call).await
    }
}
