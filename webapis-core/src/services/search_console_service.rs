//! Adds the property list's sites to Search Console.

use std::sync::Arc;

use serde::Serialize;
use webapis_provider::GoogleApiCall;

use crate::accumulator::DedupAccumulator;
use crate::batch::{BatchDispatcher, BatchReport, ItemContext};
use crate::error::CoreResult;
use crate::property_list::PropertyRow;
use crate::services::{ServiceContext, log_item_failure};

#[derive(Debug, Clone, Serialize)]
pub struct SearchConsoleSyncReport {
    pub rows: usize,
    /// Rows without a website URL.
    pub skipped: usize,
    /// Rows whose domain was already seen; the last one was kept.
    pub duplicates: usize,
    pub batch: BatchReport,
}

pub struct SearchConsoleSyncService {
    ctx: Arc<ServiceContext>,
}

impl SearchConsoleSyncService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Add one site per domain of `rows`, in a single batch.
    pub async fn run(&self, rows: &[PropertyRow]) -> CoreResult<SearchConsoleSyncReport> {
        let executor = self.ctx.google_batch()?;

        let mut sites: DedupAccumulator<String, &PropertyRow> = DedupAccumulator::new();
        let mut skipped = 0;
        for row in rows {
            if !row.has_url() {
                log::warn!("Row of account {} has no website URL, skipped", row.account);
                skipped += 1;
                continue;
            }
            sites.put(row.identity_key(), row);
        }

        let mut dispatcher = BatchDispatcher::new(executor);
        for (domain, row) in sites.get_all() {
            log::info!(
                "Currently in the {} account, adding {} to Google Search Console",
                row.account,
                row.properties
            );
            dispatcher.add(
                ItemContext::new(Some(row.account.as_str()), domain.clone()),
                GoogleApiCall::add_site(&row.properties),
            );
        }

        log::info!("Adding {} site(s) to Google Search Console", dispatcher.len());
        let batch = dispatcher
            .dispatch(|item, outcome| match outcome.error() {
                None => log::info!("Site {} added", item.identity),
                Some(e) => log_item_failure(&format!("Site {} not added", item.identity), e),
            })
            .await;

        log::info!("{} site(s) added, {} failed", batch.succeeded, batch.failed());
        Ok(SearchConsoleSyncReport {
            rows: rows.len(),
            skipped,
            duplicates: sites.replaced(),
            batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property_list::read_property_list_from;
    use crate::test_utils::MockBatch;

    const INPUT: &str = "\
Account,Properties
Acme,http://www.a.com/
Acme,https://a.com
Acme,
Beta,http://b.com/
Beta,http://c.com/
";

    #[tokio::test]
    async fn duplicate_domains_are_added_once() {
        let executor = Arc::new(MockBatch::<GoogleApiCall>::new());
        let ctx = ServiceContext::new().with_google_batch(executor.clone());
        let rows = read_property_list_from(INPUT.as_bytes()).unwrap();

        let report = SearchConsoleSyncService::new(Arc::new(ctx)).run(&rows).await.unwrap();
        assert_eq!(report.rows, 5);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.batch.submitted, 3);

        let paths: Vec<String> = executor.calls().await.into_iter().map(|c| c.path).collect();
        // Last write wins: the https variant replaced the first a.com row
        assert_eq!(
            paths,
            vec!["sites/https%3A%2F%2Fa.com", "sites/http%3A%2F%2Fb.com%2F", "sites/http%3A%2F%2Fc.com%2F"]
        );
    }

    #[tokio::test]
    async fn one_rejected_site_does_not_stop_the_others() {
        let executor = Arc::new(MockBatch::new().fail_when(|call: &GoogleApiCall| call.path.contains("b.com")));
        let ctx = ServiceContext::new().with_google_batch(executor);
        let rows = read_property_list_from(INPUT.as_bytes()).unwrap();

        let report = SearchConsoleSyncService::new(Arc::new(ctx)).run(&rows).await.unwrap();
        assert_eq!(report.batch.succeeded, 2);
        assert_eq!(report.batch.application_errors, 1);
    }
}
