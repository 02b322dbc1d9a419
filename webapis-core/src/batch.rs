//! Batched write submission with per-item outcomes.
//!
//! Items are queued with [`BatchDispatcher::add`] and sent in chunks of at most
//! the executor's batch size. Every queued item gets exactly one callback,
//! whatever happens to its chunk. Failed items are not retried and never stop
//! their siblings.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use webapis_provider::{BatchCall, BatchExecutor, ProviderError};

/// Where a batch item came from, for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemContext {
    pub account: Option<String>,
    /// Domain or monitor name the item is about.
    pub identity: String,
}

impl ItemContext {
    pub fn new(account: Option<&str>, identity: impl Into<String>) -> Self {
        Self {
            account: account.map(str::to_string),
            identity: identity.into(),
        }
    }
}

/// A queued write and its context.
#[derive(Debug, Clone)]
pub struct BatchItem<C> {
    pub context: ItemContext,
    pub call: BatchCall<C>,
}

/// What happened to one item.
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    Success(Value),
    /// The vendor answered with an error.
    ApplicationError(ProviderError),
    /// No usable answer reached us.
    TransportError(ProviderError),
}

impl ItemOutcome {
    pub fn from_result(result: Result<Value, ProviderError>) -> Self {
        match result {
            Ok(body) => match body.get("error").filter(|e| !e.is_null()) {
                Some(error) => Self::ApplicationError(ProviderError::Unknown {
                    provider: "batch".to_string(),
                    raw_code: None,
                    raw_message: error.to_string(),
                }),
                None => Self::Success(body),
            },
            Err(e) if e.is_transport() => Self::TransportError(e),
            Err(e) => Self::ApplicationError(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&ProviderError> {
        match self {
            Self::Success(_) => None,
            Self::ApplicationError(e) | Self::TransportError(e) => Some(e),
        }
    }
}

/// Totals of one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub submitted: usize,
    pub succeeded: usize,
    pub application_errors: usize,
    pub transport_errors: usize,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.application_errors + self.transport_errors
    }

    fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Success(_) => self.succeeded += 1,
            ItemOutcome::ApplicationError(_) => self.application_errors += 1,
            ItemOutcome::TransportError(_) => self.transport_errors += 1,
        }
    }
}

/// Queues calls for one executor and submits them as batches.
pub struct BatchDispatcher<E: BatchExecutor + ?Sized> {
    executor: Arc<E>,
    items: Vec<BatchItem<E::Call>>,
    max_batch_size: Option<usize>,
}

impl<E: BatchExecutor + ?Sized> BatchDispatcher<E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self {
            executor,
            items: Vec::new(),
            max_batch_size: None,
        }
    }

    /// Cap chunks below the executor's own limit.
    #[must_use]
    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = Some(size);
        self
    }

    /// Queue `call`; returns the id it will be matched by.
    pub fn add(&mut self, context: ItemContext, call: E::Call) -> String {
        let id = format!("item-{}", self.items.len() + 1);
        self.items.push(BatchItem {
            context,
            call: BatchCall {
                id: id.clone(),
                call,
            },
        });
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn chunk_size(&self) -> usize {
        let limit = self.executor.max_batch_size();
        self.max_batch_size.map_or(limit, |size| size.min(limit)).max(1)
    }

    /// Submit every queued item, calling `on_item` once per item.
    ///
    /// Callbacks within a chunk come in no particular order relative to the
    /// vendor's processing.
    pub async fn dispatch(self, mut on_item: impl FnMut(&ItemContext, ItemOutcome)) -> BatchReport {
        let size = self.chunk_size();
        let (contexts, calls): (Vec<_>, Vec<_>) = self
            .items
            .into_iter()
            .map(|item| (item.context, item.call))
            .unzip();

        let mut report = BatchReport {
            submitted: calls.len(),
            ..BatchReport::default()
        };

        for (chunk, chunk_contexts) in calls.chunks(size).zip(contexts.chunks(size)) {
            log::info!("Submitting batch of {} item(s)", chunk.len());

            match self.executor.execute_batch(chunk).await {
                Ok(results) => {
                    let mut by_id: HashMap<String, Result<Value, ProviderError>> =
                        results.into_iter().map(|r| (r.id, r.result)).collect();

                    for (call, context) in chunk.iter().zip(chunk_contexts) {
                        let outcome = match by_id.remove(&call.id) {
                            Some(result) => ItemOutcome::from_result(result),
                            None => ItemOutcome::TransportError(ProviderError::NetworkError {
                                provider: "batch".to_string(),
                                detail: format!("no response for {}", call.id),
                            }),
                        };
                        report.record(&outcome);
                        on_item(context, outcome);
                    }
                }
                Err(e) => {
                    log::error!("Batch of {} item(s) failed: {e}", chunk.len());
                    for context in chunk_contexts {
                        let outcome = ItemOutcome::TransportError(e.clone());
                        report.record(&outcome);
                        on_item(context, outcome);
                    }
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBatch;
    use serde_json::json;

    fn dispatcher(executor: MockBatch<String>, n: usize) -> BatchDispatcher<MockBatch<String>> {
        let mut dispatcher = BatchDispatcher::new(Arc::new(executor));
        for i in 1..=n {
            let name = format!("site{i}.com");
            dispatcher.add(ItemContext::new(Some("Acme"), &name), name);
        }
        dispatcher
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_siblings() {
        let executor = MockBatch::new().fail_when(|call: &String| call == "site3.com");
        let mut seen = Vec::new();
        let report = dispatcher(executor, 5)
            .dispatch(|ctx, outcome| seen.push((ctx.identity.clone(), outcome.is_success())))
            .await;

        assert_eq!(report.submitted, 5);
        assert_eq!(report.succeeded, 4);
        assert_eq!(report.application_errors, 1);
        assert_eq!(seen.len(), 5);
        assert_eq!(seen.iter().filter(|(_, ok)| !ok).count(), 1);
        assert!(seen.contains(&("site3.com".to_string(), false)));
    }

    #[tokio::test]
    async fn chunks_respect_batch_size() {
        let executor = Arc::new(MockBatch::<String>::new());
        let mut dispatcher = BatchDispatcher::new(Arc::clone(&executor)).with_max_batch_size(2);
        for i in 0..5 {
            dispatcher.add(ItemContext::default(), format!("c{i}"));
        }

        let report = dispatcher.dispatch(|_, _| {}).await;
        assert_eq!(report.succeeded, 5);
        assert_eq!(executor.batch_sizes().await, vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn whole_batch_failure_reaches_every_item() {
        let executor = MockBatch::new().fail_whole_batch();
        let mut outcomes = Vec::new();
        let report = dispatcher(executor, 3)
            .dispatch(|_, outcome| outcomes.push(outcome))
            .await;

        assert_eq!(report.transport_errors, 3);
        assert_eq!(report.failed(), 3);
        assert!(outcomes.iter().all(|o| matches!(o, ItemOutcome::TransportError(_))));
    }

    #[tokio::test]
    async fn missing_response_is_transport_error() {
        let executor = MockBatch::new().drop_response_when(|call: &String| call == "site2.com");
        let report = dispatcher(executor, 2).dispatch(|_, _| {}).await;
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.transport_errors, 1);
    }

    #[test]
    fn error_payload_in_success_is_application_error() {
        let outcome = ItemOutcome::from_result(Ok(json!({"error": "Monitor already exists"})));
        assert!(matches!(outcome, ItemOutcome::ApplicationError(_)));
        assert!(outcome.error().unwrap().to_string().contains("Monitor already exists"));

        let outcome = ItemOutcome::from_result(Ok(json!({"error": null, "data": 1})));
        assert!(outcome.is_success());
        assert!(outcome.error().is_none());

        let outcome = ItemOutcome::from_result(Err(ProviderError::Timeout {
            provider: "google".to_string(),
            detail: "slow".to_string(),
        }));
        assert!(matches!(outcome, ItemOutcome::TransportError(_)));
        assert!(outcome.error().is_some_and(ProviderError::is_transport));
    }
}
