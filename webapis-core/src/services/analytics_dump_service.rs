//! Google Analytics property list dump.

use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::model::analytics::{AccountSummaryList, AnalyticsProperty};
use crate::pagination::paginate_from_start;
use crate::services::ServiceContext;
use crate::sink::{Quoting, SinkOutcome, write_csv};
use crate::transform::{Outcome, TypeCounter, analytics};

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsDumpReport {
    pub accounts: usize,
    pub properties_written: usize,
    /// Properties without a website URL, or unreadable.
    pub properties_skipped: usize,
    /// Properties written, per account name.
    pub per_account: TypeCounter,
    pub output: SinkOutcome,
}

pub struct AnalyticsDumpService {
    ctx: Arc<ServiceContext>,
}

impl AnalyticsDumpService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Write every web property with a website URL to `output` as CSV.
    pub async fn run(&self, output: &Path) -> CoreResult<AnalyticsDumpReport> {
        let api = self.ctx.analytics()?;
        let transformer = analytics::properties();
        let mut per_account = TypeCounter::new();
        let mut records = Vec::new();
        let mut accounts = 0;
        let mut skipped = 0;

        log::info!("Retrieving accounts and properties list");
        let summaries = paginate_from_start::<AccountSummaryList, _, _>(|start_index: Option<u32>| {
            let api = Arc::clone(&api);
            async move { api.list_account_summaries(start_index).await.map_err(CoreError::from) }
        });
        let mut summaries = std::pin::pin!(summaries);

        while let Some(account) = summaries.next().await {
            let account = match account {
                Ok(account) => account,
                Err(e @ CoreError::MalformedRecord { .. }) => {
                    log::warn!("Skipping account: {e}");
                    continue;
                }
                Err(e) => return Err(e),
            };
            accounts += 1;
            log::info!("Account {} ({})", account.name, account.id);

            let mut written = 0;
            for property in account.web_properties.iter() {
                let property = match property {
                    Ok(property) => AnalyticsProperty::new(&account, property),
                    Err(e) => {
                        log::warn!("Skipping property of {}: {e}", account.name);
                        skipped += 1;
                        continue;
                    }
                };
                match transformer.apply(&property, &mut per_account) {
                    Outcome::Keep(record) => {
                        log::debug!("Property {} added", property.property.id);
                        records.push(record);
                        written += 1;
                    }
                    Outcome::Drop(reason) => {
                        log::warn!(
                            "Property {} ({}) skipped: {reason}",
                            property.property.name.as_deref().unwrap_or_default(),
                            property.property.id
                        );
                        skipped += 1;
                    }
                }
            }
            log::info!("Processed {written} property(ies) for account {}", account.name);
        }

        let output = write_csv(output, &analytics::COLUMNS, &records, Quoting::Minimal)?;
        log::info!(
            "{accounts} account(s), {} property(ies) written, {skipped} skipped",
            records.len()
        );

        Ok(AnalyticsDumpReport {
            accounts,
            properties_written: records.len(),
            properties_skipped: skipped,
            per_account,
            output,
        })
    }
}
