//! Subcommand wiring: settings and credentials to clients, clients to a
//! service, and the service report to JSON.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use webapis_core::Settings;
use webapis_core::property_list::read_property_list;
use webapis_core::services::{
    AnalyticsDumpService, MonitisDumpService, MonitisSyncService, SearchConsoleSyncService, ServiceContext,
    TagManagerSyncService, ZoneBackupOptions, ZoneBackupService,
};
use webapis_provider::{
    GoogleClient, MonitisClient, ProviderCredentials, ProviderType, create_google_client, create_monitis_client,
    create_route53_client,
};

use crate::Command;

fn credentials(provider: ProviderType, path: &Path) -> Result<ProviderCredentials> {
    ProviderCredentials::from_json_file(provider, path)
        .with_context(|| format!("cannot use {provider} credentials from {}", path.display()))
}

fn google(settings: &Settings, path: &Path) -> Result<Arc<GoogleClient>> {
    let credentials = credentials(ProviderType::Google, path)?;
    Ok(create_google_client(credentials, settings.google.clone(), &settings.http)?)
}

fn monitis(settings: &Settings, path: &Path) -> Result<Arc<MonitisClient>> {
    let credentials = credentials(ProviderType::Monitis, path)?;
    Ok(create_monitis_client(credentials, settings.monitis.clone(), &settings.http)?)
}

fn to_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("cannot serialize the job report")
}

/// Run one subcommand and return its report as JSON.
pub async fn run(settings_path: Option<&Path>, command: Command) -> Result<String> {
    let settings = Settings::load(settings_path).context("cannot load settings")?;

    match command {
        Command::Route53Backup {
            credentials: path,
            output,
            with_soa,
            zone_id_reference,
        } => {
            let credentials = match path {
                Some(path) => credentials(ProviderType::Route53, &path)?,
                None => ProviderCredentials::route53_from_env()
                    .context("no --credentials given and no AWS credentials in the environment")?,
            };
            let client = create_route53_client(credentials, settings.route53.clone(), &settings.http)?;
            std::fs::create_dir_all(&output)
                .with_context(|| format!("cannot create output directory {}", output.display()))?;

            let ctx = Arc::new(ServiceContext::new().with_route53(client));
            let options = ZoneBackupOptions {
                with_soa,
                reference_by_id: zone_id_reference,
            };
            to_json(&ZoneBackupService::new(ctx).run(&output, options).await?)
        }

        Command::AnalyticsDump { credentials, output } => {
            let ctx = Arc::new(ServiceContext::new().with_analytics(google(&settings, &credentials)?));
            to_json(&AnalyticsDumpService::new(ctx).run(&output).await?)
        }

        Command::SearchConsoleAdd { credentials, input } => {
            let rows = read_property_list(&input)?;
            let ctx = Arc::new(ServiceContext::new().with_google_batch(google(&settings, &credentials)?));
            to_json(&SearchConsoleSyncService::new(ctx).run(&rows).await?)
        }

        Command::TagManagerAdd { credentials, input } => {
            let rows = read_property_list(&input)?;
            let client = google(&settings, &credentials)?;
            let ctx = Arc::new(
                ServiceContext::new()
                    .with_tag_manager(client.clone())
                    .with_google_batch(client),
            );
            to_json(&TagManagerSyncService::new(ctx).run(&rows).await?)
        }

        Command::TagManagerContainers { credentials, output } => {
            let ctx = Arc::new(ServiceContext::new().with_tag_manager(google(&settings, &credentials)?));
            to_json(&TagManagerSyncService::new(ctx).list_containers(&output).await?)
        }

        Command::MonitisAdd { credentials, input } => {
            let rows = read_property_list(&input)?;
            let client = monitis(&settings, &credentials)?;
            let ctx = Arc::new(
                ServiceContext::new()
                    .with_monitis(client.clone())
                    .with_monitis_batch(client),
            );
            to_json(&MonitisSyncService::new(ctx).run(&rows).await?)
        }

        Command::MonitisDump { credentials, output } => {
            let ctx = Arc::new(ServiceContext::new().with_monitis(monitis(&settings, &credentials)?));
            to_json(&MonitisDumpService::new(ctx).run(&output).await?)
        }
    }
}
