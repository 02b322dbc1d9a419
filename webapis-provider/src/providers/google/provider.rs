//! `AnalyticsApi` and `TagManagerApi` implementations

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::traits::{AnalyticsApi, ErrorContext, TagManagerApi};
use crate::types::GoogleApi;

use super::GoogleClient;

#[async_trait]
impl AnalyticsApi for GoogleClient {
    async fn list_account_summaries(&self, start_index: Option<u32>) -> Result<Value> {
        let url = self.api_url(GoogleApi::Analytics, "management/accountSummaries");
        let mut query = vec![("max-results", self.config.page_size.to_string())];
        if let Some(index) = start_index {
            query.push(("start-index", index.to_string()));
        }
        self.get_json(&url, &query, ErrorContext::default()).await
    }
}

#[async_trait]
impl TagManagerApi for GoogleClient {
    async fn list_accounts(&self, page_token: Option<&str>) -> Result<Value> {
        let url = self.api_url(GoogleApi::TagManager, "accounts");
        let query: Vec<(&str, String)> = page_token
            .map(|t| ("pageToken", t.to_string()))
            .into_iter()
            .collect();
        self.get_json(&url, &query, ErrorContext::default()).await
    }

    async fn list_containers(&self, account_id: &str, page_token: Option<&str>) -> Result<Value> {
        let url = self.api_url(GoogleApi::TagManager, &format!("accounts/{account_id}/containers"));
        let query: Vec<(&str, String)> = page_token
            .map(|t| ("pageToken", t.to_string()))
            .into_iter()
            .collect();
        self.get_json(&url, &query, ErrorContext::resource(account_id))
            .await
    }
}
