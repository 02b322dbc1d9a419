//! Job services.
//!
//! Each service runs one ETL job against the clients held by a
//! [`ServiceContext`] and returns a report of what it did.

mod analytics_dump_service;
mod monitis_service;
mod search_console_service;
mod tag_manager_service;
mod zone_backup_service;

pub use analytics_dump_service::{AnalyticsDumpReport, AnalyticsDumpService};
pub use monitis_service::{MonitisDumpReport, MonitisDumpService, MonitisSyncReport, MonitisSyncService};
pub use search_console_service::{SearchConsoleSyncReport, SearchConsoleSyncService};
pub use tag_manager_service::{ContainerDumpReport, TagManagerSyncReport, TagManagerSyncService};
pub use zone_backup_service::{ZoneBackupOptions, ZoneBackupReport, ZoneBackupService};

use std::sync::Arc;

use webapis_provider::{
    AddMonitorRequest, AnalyticsApi, BatchExecutor, GoogleApiCall, MonitisApi, Route53Api, TagManagerApi,
};

use crate::error::{CoreError, CoreResult};

/// Batch transport for Google calls.
pub type GoogleBatch = dyn BatchExecutor<Call = GoogleApiCall>;
/// Batch transport for Monitis monitor creation.
pub type MonitisBatch = dyn BatchExecutor<Call = AddMonitorRequest>;

/// Service context - holds the vendor clients a job may use.
///
/// Only the clients a job needs have to be set; asking for a missing one is a
/// configuration error.
#[derive(Default)]
pub struct ServiceContext {
    route53: Option<Arc<dyn Route53Api>>,
    analytics: Option<Arc<dyn AnalyticsApi>>,
    tag_manager: Option<Arc<dyn TagManagerApi>>,
    google_batch: Option<Arc<GoogleBatch>>,
    monitis: Option<Arc<dyn MonitisApi>>,
    monitis_batch: Option<Arc<MonitisBatch>>,
}

fn missing(client: &str) -> CoreError {
    CoreError::Config(format!("{client} client is not configured"))
}

impl ServiceContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_route53(mut self, client: Arc<dyn Route53Api>) -> Self {
        self.route53 = Some(client);
        self
    }

    #[must_use]
    pub fn with_analytics(mut self, client: Arc<dyn AnalyticsApi>) -> Self {
        self.analytics = Some(client);
        self
    }

    #[must_use]
    pub fn with_tag_manager(mut self, client: Arc<dyn TagManagerApi>) -> Self {
        self.tag_manager = Some(client);
        self
    }

    #[must_use]
    pub fn with_google_batch(mut self, client: Arc<GoogleBatch>) -> Self {
        self.google_batch = Some(client);
        self
    }

    #[must_use]
    pub fn with_monitis(mut self, client: Arc<dyn MonitisApi>) -> Self {
        self.monitis = Some(client);
        self
    }

    #[must_use]
    pub fn with_monitis_batch(mut self, client: Arc<MonitisBatch>) -> Self {
        self.monitis_batch = Some(client);
        self
    }

    pub fn route53(&self) -> CoreResult<Arc<dyn Route53Api>> {
        self.route53.clone().ok_or_else(|| missing("Route53"))
    }

    pub fn analytics(&self) -> CoreResult<Arc<dyn AnalyticsApi>> {
        self.analytics.clone().ok_or_else(|| missing("Analytics"))
    }

    pub fn tag_manager(&self) -> CoreResult<Arc<dyn TagManagerApi>> {
        self.tag_manager.clone().ok_or_else(|| missing("Tag Manager"))
    }

    pub fn google_batch(&self) -> CoreResult<Arc<GoogleBatch>> {
        self.google_batch.clone().ok_or_else(|| missing("Google batch"))
    }

    pub fn monitis(&self) -> CoreResult<Arc<dyn MonitisApi>> {
        self.monitis.clone().ok_or_else(|| missing("Monitis"))
    }

    pub fn monitis_batch(&self) -> CoreResult<Arc<MonitisBatch>> {
        self.monitis_batch.clone().ok_or_else(|| missing("Monitis batch"))
    }
}

/// Log a failed batch item at a level matching how surprising the failure is.
pub(crate) fn log_item_failure(what: &str, error: &webapis_provider::ProviderError) {
    if error.is_expected() {
        log::warn!("{what}: {error}");
    } else {
        log::error!("{what}: {error}");
    }
}
