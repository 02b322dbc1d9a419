//! Monitis RUM monitors: creation from the property list, and the monitor
//! list dump.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use webapis_provider::AddMonitorRequest;

use crate::accumulator::DedupAccumulator;
use crate::batch::{BatchDispatcher, BatchReport, ItemContext};
use crate::error::CoreResult;
use crate::model::monitis::Monitor;
use crate::property_list::PropertyRow;
use crate::services::{ServiceContext, log_item_failure};
use crate::sink::{Quoting, SinkOutcome, write_csv};
use crate::transform::{Outcome, TypeCounter, monitis};
use crate::wrapper::RawList;

#[derive(Debug, Clone, Serialize)]
pub struct MonitisSyncReport {
    pub rows: usize,
    /// Rows without a monitorable URL.
    pub skipped: usize,
    /// Rows whose monitor name was already seen; the last one was kept.
    pub duplicates: usize,
    pub batch: BatchReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitisDumpReport {
    pub monitors: usize,
    pub written: usize,
    pub skipped: usize,
    /// Monitors written, per monitor type.
    pub per_type: TypeCounter,
    pub output: SinkOutcome,
}

struct Staged<'a> {
    account: &'a str,
    url: &'a str,
}

/// `http://www.acme.com/fr` → `www.acme.com/fr`
fn monitored_resource(url: &str) -> Option<&str> {
    url.split_once("//")
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
}

pub struct MonitisSyncService {
    ctx: Arc<ServiceContext>,
}

impl MonitisSyncService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Create one RUM monitor per domain of `rows`, tagged with the row's account.
    pub async fn run(&self, rows: &[PropertyRow]) -> CoreResult<MonitisSyncReport> {
        let api = self.ctx.monitis()?;
        let executor = self.ctx.monitis_batch()?;

        let mut staged: DedupAccumulator<String, Staged<'_>> = DedupAccumulator::new();
        let mut skipped = 0;
        for row in rows {
            if !row.has_url() {
                log::warn!(
                    "A property of {} can't be monitored, it might be an application",
                    row.account
                );
                skipped += 1;
                continue;
            }
            let Some(url) = monitored_resource(&row.properties) else {
                log::warn!("Property {} has no scheme, skipped", row.properties);
                skipped += 1;
                continue;
            };
            staged.put(
                format!("{}_RUM", row.identity_key()),
                Staged {
                    account: &row.account,
                    url,
                },
            );
        }

        let auth_token = api.get_auth_token().await?;

        let mut dispatcher = BatchDispatcher::new(executor);
        for (name, monitor) in staged.get_all() {
            log::info!("Adding monitor {name} for {}", monitor.url);
            dispatcher.add(
                ItemContext::new(Some(monitor.account), name.clone()),
                AddMonitorRequest {
                    auth_token: auth_token.clone(),
                    name: name.clone(),
                    url: monitor.url.to_string(),
                    tag: serde_json::json!([monitor.account]).to_string(),
                },
            );
        }

        let batch = dispatcher
            .dispatch(|item, outcome| match outcome.error() {
                None => log::info!("Monitor {} added", item.identity),
                Some(e) => log_item_failure(&format!("Monitor {} not added", item.identity), e),
            })
            .await;

        log::info!("{} monitor(s) added, {} failed", batch.succeeded, batch.failed());
        Ok(MonitisSyncReport {
            rows: rows.len(),
            skipped,
            duplicates: staged.replaced(),
            batch,
        })
    }
}

pub struct MonitisDumpService {
    ctx: Arc<ServiceContext>,
}

impl MonitisDumpService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Write every RUM monitor to `output` as CSV.
    pub async fn run(&self, output: &Path) -> CoreResult<MonitisDumpReport> {
        let api = self.ctx.monitis()?;
        let auth_token = api.get_auth_token().await?;

        log::info!("Retrieving Monitis monitors");
        let listed = RawList::<Monitor>::from_value(api.list_monitors(&auth_token).await?);
        let transformer = monitis::monitors();
        let mut per_type = TypeCounter::new();
        let mut records = Vec::new();
        let mut skipped = 0;

        for monitor in listed.iter() {
            let monitor = match monitor {
                Ok(monitor) => monitor,
                Err(e) => {
                    log::warn!("Skipping monitor: {e}");
                    skipped += 1;
                    continue;
                }
            };
            match transformer.apply(&monitor, &mut per_type) {
                Outcome::Keep(record) => records.push(record),
                Outcome::Drop(reason) => {
                    log::warn!("Monitor {} skipped: {reason}", monitor.id);
                    skipped += 1;
                }
            }
        }

        let output = write_csv(output, &monitis::COLUMNS, &records, Quoting::NonNumeric)?;
        log::info!("{} monitor(s) written", records.len());
        Ok(MonitisDumpReport {
            monitors: listed.len(),
            written: records.len(),
            skipped,
            per_type,
            output,
        })
    }
}
