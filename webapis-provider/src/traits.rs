use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::types::{AddMonitorRequest, BatchCall, BatchCallResult, RecordSetCursor};

/// Raw API error, before mapping (internal use).
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code; format differs per vendor (HTTP status, AWS code, Google status).
    pub code: Option<String>,
    /// Original error message.
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra information used while mapping an error (internal use).
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Resource the call was about (zone id, account id, site URL, monitor name).
    pub resource: Option<String>,
    /// Value of a `Retry-After` header, when the API sent one.
    pub retry_after: Option<u64>,
}

impl ErrorContext {
    pub fn resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Self::default()
        }
    }
}

/// Maps vendor error payloads onto [`ProviderError`] (internal use).
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier.
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type.
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: parse error.
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: unknown error (fallback).
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// AWS Route53 listing calls.
///
/// Responses are JSON documents in the listing shape of the Route53 API
/// (`HostedZones`, `IsTruncated`, `NextMarker`, ...), whatever the wire format.
#[async_trait]
pub trait Route53Api: Send + Sync {
    /// `ListHostedZones`, resuming at `marker`.
    async fn list_hosted_zones(&self, marker: Option<&str>) -> Result<Value>;

    /// `ListResourceRecordSets` of `zone_id` (short form, without `/hostedzone/`).
    async fn list_resource_record_sets(
        &self,
        zone_id: &str,
        start: Option<&RecordSetCursor>,
    ) -> Result<Value>;
}

/// Google Analytics management API (v3).
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// `management.accountSummaries.list`, starting at the 1-based `start_index`.
    async fn list_account_summaries(&self, start_index: Option<u32>) -> Result<Value>;
}

/// Google Tag Manager API (v2).
#[async_trait]
pub trait TagManagerApi: Send + Sync {
    /// `accounts.list`
    async fn list_accounts(&self, page_token: Option<&str>) -> Result<Value>;

    /// `accounts.containers.list`
    async fn list_containers(&self, account_id: &str, page_token: Option<&str>) -> Result<Value>;
}

/// Monitis custom monitor API.
#[async_trait]
pub trait MonitisApi: Send + Sync {
    /// Exchange the API key and secret for an auth token.
    async fn get_auth_token(&self) -> Result<String>;

    /// Create one RUM monitor. A `200` carrying an error payload is an error.
    async fn add_rum_monitor(&self, request: &AddMonitorRequest) -> Result<Value>;

    /// List RUM monitors; the response is a JSON array.
    async fn list_monitors(&self, auth_token: &str) -> Result<Value>;
}

/// Sends a set of independent calls as one logical batch.
///
/// The default implementation runs [`execute_call`](Self::execute_call) for every
/// call concurrently and collects per-call results. Vendors with a native batch
/// endpoint override [`execute_batch`](Self::execute_batch).
#[async_trait]
pub trait BatchExecutor: Send + Sync {
    /// The vendor call type.
    type Call: Send + Sync;

    /// Largest number of calls accepted in one batch.
    fn max_batch_size(&self) -> usize {
        1000
    }

    /// Execute a single call.
    async fn execute_call(&self, call: &Self::Call) -> Result<Value>;

    /// Execute a batch.
    ///
    /// `Err` means the batch as a whole failed and no call has a known outcome.
    /// Otherwise every call's outcome is reported in its [`BatchCallResult`].
    async fn execute_batch(&self, calls: &[BatchCall<Self::Call>]) -> Result<Vec<BatchCallResult>> {
        let futures: Vec<_> = calls.iter().map(|c| self.execute_call(&c.call)).collect();
        let results = futures::future::join_all(futures).await;

        Ok(calls
            .iter()
            .zip(results)
            .map(|(call, result)| BatchCallResult {
                id: call.id.clone(),
                result,
            })
            .collect())
    }
}
