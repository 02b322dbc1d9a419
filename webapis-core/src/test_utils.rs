//! Test helpers
//!
//! In-memory vendor APIs serving canned JSON pages, and a batch executor whose
//! failures can be scripted.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use webapis_provider::{
    AddMonitorRequest, AnalyticsApi, BatchCall, BatchCallResult, BatchExecutor, MonitisApi, ProviderError,
    RecordSetCursor, Route53Api, TagManagerApi,
};

type Result<T> = std::result::Result<T, ProviderError>;

fn no_page(provider: &str, what: String) -> ProviderError {
    ProviderError::NetworkError {
        provider: provider.to_string(),
        detail: format!("no canned page for {what}"),
    }
}

// ===== MockRoute53 =====

/// Zone pages keyed by marker; record pages keyed by zone id and start name.
#[derive(Default)]
pub struct MockRoute53 {
    zone_pages: HashMap<Option<String>, Value>,
    record_pages: HashMap<(String, Option<String>), Value>,
}

impl MockRoute53 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone_page(mut self, marker: Option<&str>, page: Value) -> Self {
        self.zone_pages.insert(marker.map(str::to_string), page);
        self
    }

    pub fn with_record_page(mut self, zone_id: &str, start_name: Option<&str>, page: Value) -> Self {
        self.record_pages
            .insert((zone_id.to_string(), start_name.map(str::to_string)), page);
        self
    }
}

#[async_trait]
impl Route53Api for MockRoute53 {
    async fn list_hosted_zones(&self, marker: Option<&str>) -> Result<Value> {
        self.zone_pages
            .get(&marker.map(str::to_string))
            .cloned()
            .ok_or_else(|| no_page("route53", format!("zones at {marker:?}")))
    }

    async fn list_resource_record_sets(&self, zone_id: &str, start: Option<&RecordSetCursor>) -> Result<Value> {
        let key = (zone_id.to_string(), start.map(|c| c.name.clone()));
        self.record_pages
            .get(&key)
            .cloned()
            .ok_or_else(|| no_page("route53", format!("records of {key:?}")))
    }
}

// ===== MockAnalytics =====

/// Account summary pages keyed by start index.
#[derive(Default)]
pub struct MockAnalytics {
    pages: HashMap<Option<u32>, Value>,
}

impl MockAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, start_index: Option<u32>, page: Value) -> Self {
        self.pages.insert(start_index, page);
        self
    }
}

#[async_trait]
impl AnalyticsApi for MockAnalytics {
    async fn list_account_summaries(&self, start_index: Option<u32>) -> Result<Value> {
        self.pages
            .get(&start_index)
            .cloned()
            .ok_or_else(|| no_page("google", format!("account summaries at {start_index:?}")))
    }
}

// ===== MockTagManager =====

#[derive(Default)]
pub struct MockTagManager {
    account_pages: HashMap<Option<String>, Value>,
    container_pages: HashMap<(String, Option<String>), Value>,
}

impl MockTagManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account_page(mut self, token: Option<&str>, page: Value) -> Self {
        self.account_pages.insert(token.map(str::to_string), page);
        self
    }

    pub fn with_container_page(mut self, account_id: &str, token: Option<&str>, page: Value) -> Self {
        self.container_pages
            .insert((account_id.to_string(), token.map(str::to_string)), page);
        self
    }
}

#[async_trait]
impl TagManagerApi for MockTagManager {
    async fn list_accounts(&self, page_token: Option<&str>) -> Result<Value> {
        self.account_pages
            .get(&page_token.map(str::to_string))
            .cloned()
            .ok_or_else(|| no_page("google", format!("accounts at {page_token:?}")))
    }

    async fn list_containers(&self, account_id: &str, page_token: Option<&str>) -> Result<Value> {
        let key = (account_id.to_string(), page_token.map(str::to_string));
        self.container_pages
            .get(&key)
            .cloned()
            .ok_or_else(|| no_page("google", format!("containers of {key:?}")))
    }
}

// ===== MockMonitis =====

/// Monitis API with one token and a fixed monitor listing. Creating a monitor
/// whose name is in `rejected` fails with the given error.
pub struct MockMonitis {
    token: Option<String>,
    monitors: Value,
    rejected: HashMap<String, ProviderError>,
    added: Mutex<Vec<AddMonitorRequest>>,
}

impl MockMonitis {
    pub fn new() -> Self {
        Self {
            token: Some("tok-1".to_string()),
            monitors: json!([]),
            rejected: HashMap::new(),
            added: Mutex::new(Vec::new()),
        }
    }

    pub fn without_token(mut self) -> Self {
        self.token = None;
        self
    }

    pub fn with_monitors(mut self, monitors: Value) -> Self {
        self.monitors = monitors;
        self
    }

    pub fn rejecting(mut self, name: &str, error: ProviderError) -> Self {
        self.rejected.insert(name.to_string(), error);
        self
    }

    pub async fn added(&self) -> Vec<AddMonitorRequest> {
        self.added.lock().await.clone()
    }
}

#[async_trait]
impl MonitisApi for MockMonitis {
    async fn get_auth_token(&self) -> Result<String> {
        self.token.clone().ok_or_else(|| ProviderError::InvalidCredentials {
            provider: "monitis".to_string(),
            raw_message: Some("Invalid api key".to_string()),
        })
    }

    async fn add_rum_monitor(&self, request: &AddMonitorRequest) -> Result<Value> {
        if let Some(e) = self.rejected.get(&request.name) {
            return Err(e.clone());
        }
        self.added.lock().await.push(request.clone());
        Ok(json!({"status": "ok", "data": {"testId": 1}}))
    }

    async fn list_monitors(&self, auth_token: &str) -> Result<Value> {
        if self.token.as_deref() != Some(auth_token) {
            return Err(ProviderError::InvalidCredentials {
                provider: "monitis".to_string(),
                raw_message: None,
            });
        }
        Ok(self.monitors.clone())
    }
}

#[async_trait]
impl BatchExecutor for MockMonitis {
    type Call = AddMonitorRequest;

    async fn execute_call(&self, call: &AddMonitorRequest) -> Result<Value> {
        self.add_rum_monitor(call).await
    }
}

// ===== MockBatch =====

type Predicate<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// Batch executor recording every batch it receives.
pub struct MockBatch<C> {
    fail: Option<Predicate<C>>,
    drop_response: Option<Predicate<C>>,
    fail_whole_batch: bool,
    batches: Mutex<Vec<Vec<C>>>,
}

impl<C> MockBatch<C> {
    pub fn new() -> Self {
        Self {
            fail: None,
            drop_response: None,
            fail_whole_batch: false,
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Calls matching `predicate` get an application error.
    pub fn fail_when(mut self, predicate: impl Fn(&C) -> bool + Send + Sync + 'static) -> Self {
        self.fail = Some(Box::new(predicate));
        self
    }

    /// Calls matching `predicate` get no response at all.
    pub fn drop_response_when(mut self, predicate: impl Fn(&C) -> bool + Send + Sync + 'static) -> Self {
        self.drop_response = Some(Box::new(predicate));
        self
    }

    /// Every batch fails as a whole.
    pub fn fail_whole_batch(mut self) -> Self {
        self.fail_whole_batch = true;
        self
    }
}

impl<C: Clone> MockBatch<C> {
    pub async fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().await.iter().map(Vec::len).collect()
    }

    /// Every call received, in submission order.
    pub async fn calls(&self) -> Vec<C> {
        self.batches.lock().await.iter().flatten().cloned().collect()
    }
}

#[async_trait]
impl<C: Clone + Send + Sync + 'static> BatchExecutor for MockBatch<C> {
    type Call = C;

    async fn execute_call(&self, call: &C) -> Result<Value> {
        if self.fail.as_ref().is_some_and(|fail| fail(call)) {
            return Err(ProviderError::ResourceExists {
                provider: "mock".to_string(),
                resource: "item".to_string(),
                raw_message: None,
            });
        }
        Ok(json!({"ok": true}))
    }

    async fn execute_batch(&self, calls: &[BatchCall<C>]) -> Result<Vec<BatchCallResult>> {
        self.batches
            .lock()
            .await
            .push(calls.iter().map(|c| c.call.clone()).collect());

        if self.fail_whole_batch {
            return Err(ProviderError::NetworkError {
                provider: "mock".to_string(),
                detail: "connection reset".to_string(),
            });
        }

        let mut results = Vec::new();
        for call in calls {
            if self.drop_response.as_ref().is_some_and(|drop| drop(&call.call)) {
                continue;
            }
            results.push(BatchCallResult {
                id: call.id.clone(),
                result: self.execute_call(&call.call).await,
            });
        }
        Ok(results)
    }
}
