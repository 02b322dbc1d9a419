//! Route53 zone backup: one CloudFormation template per hosted zone.

use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use webapis_provider::{RecordSetCursor, Route53Api};

use crate::error::{CoreError, CoreResult};
use crate::model::route53::{HostedZone, HostedZoneList, ResourceRecordSetList};
use crate::model::template::ZoneTemplate;
use crate::pagination::paginate_from_start;
use crate::services::ServiceContext;
use crate::sink::{SinkOutcome, write_yaml};
use crate::transform::{Outcome, TypeCounter, TransformedRecord, route53};

#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneBackupOptions {
    /// Keep `SOA` and `NS` record sets.
    pub with_soa: bool,
    /// Reference the zone by id instead of by name in the record group.
    pub reference_by_id: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ZoneBackupReport {
    pub zones: usize,
    pub templates_written: usize,
    /// Zones with no record left to back up; no file written.
    pub zones_empty: usize,
    pub zones_failed: usize,
    /// Zone entries that could not be read.
    pub zones_malformed: usize,
    pub records_skipped: usize,
    /// Records written, per record type.
    pub record_types: TypeCounter,
}

/// Route53 zone backup service
pub struct ZoneBackupService {
    ctx: Arc<ServiceContext>,
}

impl ZoneBackupService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Write a template for every hosted zone into `output_dir`.
    ///
    /// A zone whose records cannot be listed is counted as failed and the run
    /// goes on. Failing to list the zones themselves ends the run.
    pub async fn run(&self, output_dir: &Path, options: ZoneBackupOptions) -> CoreResult<ZoneBackupReport> {
        let api = self.ctx.route53()?;
        let mut report = ZoneBackupReport::default();

        log::info!("Retrieving Route53 hosted zones");
        let zones = paginate_from_start::<HostedZoneList, _, _>(|marker: Option<String>| {
            let api = Arc::clone(&api);
            async move { api.list_hosted_zones(marker.as_deref()).await.map_err(CoreError::from) }
        });
        let mut zones = std::pin::pin!(zones);

        while let Some(zone) = zones.next().await {
            let zone = match zone {
                Ok(zone) => zone,
                Err(e @ CoreError::MalformedRecord { .. }) => {
                    log::warn!("Skipping hosted zone: {e}");
                    report.zones_malformed += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            report.zones += 1;

            log::info!("Creating template for {} zone", zone.name);
            let mut counter = TypeCounter::new();
            match backup_zone(&api, &zone, output_dir, options, &mut counter, &mut report.records_skipped).await {
                Ok(SinkOutcome::Written { .. }) => {
                    report.templates_written += 1;
                    report.record_types.merge(&counter);
                }
                Ok(SinkOutcome::Skipped) => {
                    log::warn!("Zone {} has no records to back up", zone.name);
                    report.zones_empty += 1;
                }
                Err(e) => {
                    log::error!("Backup of zone {} ({}) failed: {e}", zone.name, zone.short_id());
                    report.zones_failed += 1;
                }
            }
        }

        log::info!("{} templates have been created", report.templates_written);
        if report.zones_failed > 0 || report.zones_empty > 0 {
            log::warn!(
                "{} zone(s) failed, {} zone(s) had no records",
                report.zones_failed,
                report.zones_empty
            );
        }
        Ok(report)
    }
}

async fn backup_zone(
    api: &Arc<dyn Route53Api>,
    zone: &HostedZone,
    output_dir: &Path,
    options: ZoneBackupOptions,
    counter: &mut TypeCounter,
    skipped: &mut usize,
) -> CoreResult<SinkOutcome> {
    let transformer = route53::record_sets(options.with_soa);
    let zone_id = zone.short_id().to_string();

    let sets = paginate_from_start::<ResourceRecordSetList, _, _>(|cursor: Option<RecordSetCursor>| {
        let api = Arc::clone(api);
        let zone_id = zone_id.clone();
        async move {
            api.list_resource_record_sets(&zone_id, cursor.as_ref())
                .await
                .map_err(CoreError::from)
        }
    });
    let mut sets = std::pin::pin!(sets);

    let mut records: Vec<TransformedRecord> = Vec::new();
    while let Some(set) = sets.next().await {
        let set = match set {
            Ok(set) => set,
            Err(e @ CoreError::MalformedRecord { .. }) => {
                log::warn!("Skipping record in {}: {e}", zone.name);
                *skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        match transformer.apply(&set, counter) {
            Outcome::Keep(record) => records.push(record),
            Outcome::Drop(reason) => {
                log::debug!("Skipping {} {}: {reason}", set.record_type, set.name);
                *skipped += 1;
            }
        }
    }

    let template = ZoneTemplate::new(zone, options.reference_by_id, records);
    let path = output_dir.join(template.file_name());
    write_yaml(&path, &template, template.record_sets().len())
}
