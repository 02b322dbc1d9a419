//! Google Tag Manager: container creation from the property list, and the
//! container list dump.

use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use serde::Serialize;
use webapis_provider::{GoogleApiCall, TagManagerApi};

use crate::accumulator::{DedupAccumulator, derive_identity_key};
use crate::batch::{BatchDispatcher, BatchReport, ItemContext};
use crate::error::{CoreError, CoreResult};
use crate::model::tagmanager::{AccountContainer, AccountList, ContainerList, TagManagerAccount};
use crate::pagination::paginate_from_start;
use crate::property_list::{PropertyRow, group_by_account};
use crate::services::{ServiceContext, log_item_failure};
use crate::sink::{Quoting, SinkOutcome, write_csv};
use crate::transform::{Outcome, TypeCounter, tagmanager};

#[derive(Debug, Clone, Serialize)]
pub struct TagManagerSyncReport {
    pub accounts_matched: usize,
    /// Property list accounts with no Tag Manager account of the same name.
    pub missing_accounts: Vec<String>,
    /// URLs sharing a domain with an earlier URL of the same account.
    pub duplicates: usize,
    pub batch: BatchReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerDumpReport {
    pub accounts: usize,
    /// Accounts whose containers could not be listed.
    pub accounts_failed: usize,
    /// Containers written, per account name.
    pub containers: TypeCounter,
    pub output: SinkOutcome,
}

pub struct TagManagerSyncService {
    ctx: Arc<ServiceContext>,
}

impl TagManagerSyncService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Create one web container per domain, under the Tag Manager account
    /// named like the row's account.
    pub async fn run(&self, rows: &[PropertyRow]) -> CoreResult<TagManagerSyncReport> {
        let executor = self.ctx.google_batch()?;
        let accounts = self.accounts().await?;
        let grouped = group_by_account(rows);

        let mut dispatcher = BatchDispatcher::new(executor);
        let mut missing_accounts = Vec::new();
        let mut accounts_matched = 0;
        let mut duplicates = 0;

        for (name, urls) in grouped.get_all() {
            // Names are not unique in Tag Manager; the first listed wins
            let Some(account) = accounts.iter().find(|a| &a.name == name) else {
                missing_accounts.push(name.clone());
                continue;
            };
            accounts_matched += 1;

            let mut domains: DedupAccumulator<String, &str> = DedupAccumulator::new();
            for url in urls {
                domains.put(derive_identity_key(url), url);
            }
            duplicates += domains.replaced();

            for (domain, _) in domains.get_all() {
                log::info!("Currently in the {name} account, adding container {domain}");
                dispatcher.add(
                    ItemContext::new(Some(name.as_str()), domain.clone()),
                    GoogleApiCall::create_container(&account.account_id, domain),
                );
            }
        }

        if !missing_accounts.is_empty() {
            log::warn!(
                "{} account(s) do not exist in Tag Manager, please create them manually: {}",
                missing_accounts.len(),
                missing_accounts.join(", ")
            );
        }

        log::info!("Creating {} container(s)", dispatcher.len());
        let batch = dispatcher
            .dispatch(|item, outcome| match outcome.error() {
                None => log::info!("Container {} created", item.identity),
                Some(e) => log_item_failure(
                    &format!(
                        "Container {} of {} not created",
                        item.identity,
                        item.account.as_deref().unwrap_or("?")
                    ),
                    e,
                ),
            })
            .await;

        log::info!("{} container(s) created, {} failed", batch.succeeded, batch.failed());
        Ok(TagManagerSyncReport {
            accounts_matched,
            missing_accounts,
            duplicates,
            batch,
        })
    }

    /// Write every container of every account to `output` as CSV.
    ///
    /// An account whose containers cannot be listed is counted and skipped.
    pub async fn list_containers(&self, output: &Path) -> CoreResult<ContainerDumpReport> {
        let api = self.ctx.tag_manager()?;
        let accounts = self.accounts().await?;
        let transformer = tagmanager::containers();
        let mut containers = TypeCounter::new();
        let mut records = Vec::new();
        let mut accounts_failed = 0;

        for account in &accounts {
            log::info!("Listing containers of {} ({})", account.name, account.account_id);
            let listed = match account_containers(&api, account).await {
                Ok(listed) => listed,
                Err(e) => {
                    log::error!("Cannot list containers of {}: {e}", account.name);
                    accounts_failed += 1;
                    continue;
                }
            };
            for item in listed {
                match transformer.apply(&item, &mut containers) {
                    Outcome::Keep(record) => records.push(record),
                    Outcome::Drop(reason) => log::warn!("Container of {} skipped: {reason}", account.name),
                }
            }
        }

        let output = write_csv(output, &tagmanager::COLUMNS, &records, Quoting::Minimal)?;
        log::info!("{} container(s) in {} account(s)", records.len(), accounts.len());
        Ok(ContainerDumpReport {
            accounts: accounts.len(),
            accounts_failed,
            containers,
            output,
        })
    }

    async fn accounts(&self) -> CoreResult<Vec<TagManagerAccount>> {
        let api = self.ctx.tag_manager()?;
        log::info!("Retrieving Tag Manager accounts");
        let stream = paginate_from_start::<AccountList, _, _>(|token: Option<String>| {
            let api = Arc::clone(&api);
            async move { api.list_accounts(token.as_deref()).await.map_err(CoreError::from) }
        });
        let mut stream = std::pin::pin!(stream);

        let mut accounts = Vec::new();
        while let Some(account) = stream.next().await {
            match account {
                Ok(account) => accounts.push(account),
                Err(e @ CoreError::MalformedRecord { .. }) => log::warn!("Skipping account: {e}"),
                Err(e) => return Err(e),
            }
        }
        log::debug!("{} Tag Manager account(s)", accounts.len());
        Ok(accounts)
    }
}

async fn account_containers(
    api: &Arc<dyn TagManagerApi>,
    account: &TagManagerAccount,
) -> CoreResult<Vec<AccountContainer>> {
    let account_id = account.account_id.clone();
    let stream = paginate_from_start::<ContainerList, _, _>(|token: Option<String>| {
        let api = Arc::clone(api);
        let account_id = account_id.clone();
        async move {
            api.list_containers(&account_id, token.as_deref())
                .await
                .map_err(CoreError::from)
        }
    });
    let mut stream = std::pin::pin!(stream);

    let mut listed = Vec::new();
    while let Some(container) = stream.next().await {
        match container {
            Ok(container) => listed.push(AccountContainer {
                account: account.clone(),
                container,
            }),
            Err(e @ CoreError::MalformedRecord { .. }) => log::warn!("Skipping container of {}: {e}", account.name),
            Err(e) => return Err(e),
        }
    }
    Ok(listed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property_list::read_property_list_from;
    use crate::test_utils::{MockBatch, MockTagManager};
    use serde_json::json;

    const INPUT: &str = "\
Account,Properties
Acme,http://www.acme.com/
Acme,https://acme.com/fr
Acme,http://acme.fr
Nobody,http://nobody.org
Beta,
";

    fn accounts() -> MockTagManager {
        MockTagManager::new()
            .with_account_page(
                None,
                json!({"account": [{"accountId": "10", "name": "Acme"}], "nextPageToken": "p2"}),
            )
            .with_account_page(
                Some("p2"),
                json!({"account": [{"accountId": "11", "name": "Acme"}, {"accountId": "20", "name": "Beta"}]}),
            )
    }

    #[tokio::test]
    async fn creates_one_container_per_domain() {
        let executor = Arc::new(MockBatch::<GoogleApiCall>::new());
        let ctx = ServiceContext::new()
            .with_tag_manager(Arc::new(accounts()))
            .with_google_batch(executor.clone());
        let rows = read_property_list_from(INPUT.as_bytes()).unwrap();

        let report = TagManagerSyncService::new(Arc::new(ctx)).run(&rows).await.unwrap();
        assert_eq!(report.accounts_matched, 1);
        assert_eq!(report.missing_accounts, vec!["Nobody"]);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.batch.succeeded, 2);

        let calls = executor.calls().await;
        assert!(calls.iter().all(|c| c.path == "accounts/10/containers"));
        let names: Vec<_> = calls.iter().map(|c| c.body.as_ref().unwrap()["name"].clone()).collect();
        assert_eq!(names, vec![json!("acme.com"), json!("acme.fr")]);
    }

    #[tokio::test]
    async fn unknown_accounts_are_collected_and_skipped() {
        let executor = Arc::new(MockBatch::<GoogleApiCall>::new());
        let ctx = ServiceContext::new()
            .with_tag_manager(Arc::new(accounts()))
            .with_google_batch(executor.clone());
        let input = "Account,Properties\nGhost,http://ghost.io\nNobody,http://nobody.org\nGhost,http://ghost.net\n";
        let rows = read_property_list_from(input.as_bytes()).unwrap();

        let report = TagManagerSyncService::new(Arc::new(ctx)).run(&rows).await.unwrap();
        assert_eq!(report.accounts_matched, 0);
        assert_eq!(report.missing_accounts, vec!["Ghost", "Nobody"]);
        assert_eq!(report.batch.submitted, 0);
        assert!(executor.calls().await.is_empty());
    }

    #[tokio::test]
    async fn account_listing_failure_ends_run() {
        let ctx = ServiceContext::new()
            .with_tag_manager(Arc::new(MockTagManager::new()))
            .with_google_batch(Arc::new(MockBatch::<GoogleApiCall>::new()));
        let rows = read_property_list_from(INPUT.as_bytes()).unwrap();

        let err = TagManagerSyncService::new(Arc::new(ctx)).run(&rows).await.unwrap_err();
        assert!(matches!(err, CoreError::Provider(_)));
    }

    #[tokio::test]
    async fn dumps_containers_and_survives_a_failed_account() {
        let mock = accounts()
            .with_container_page(
                "10",
                None,
                json!({"container": [{"containerId": "1", "name": "acme.com"}], "nextPageToken": "c2"}),
            )
            .with_container_page("10", Some("c2"), json!({"container": [{"containerId": "2", "name": "acme.fr"}]}))
            .with_container_page("20", None, json!({}));
        let ctx = ServiceContext::new().with_tag_manager(Arc::new(mock));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("containers.csv");

        let report = TagManagerSyncService::new(Arc::new(ctx))
            .list_containers(&path)
            .await
            .unwrap();
        assert_eq!(report.accounts, 3);
        assert_eq!(report.accounts_failed, 1);
        assert_eq!(report.containers.get("Acme"), 2);
        assert!(report.output.is_written());

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Account Id,Account,Container Id,Container\n10,Acme,1,acme.com\n10,Acme,2,acme.fr\n"
        );
    }
}
