//! Google Analytics management views (`accountSummaries`).

use serde::Deserialize;
use serde_json::Value;

use crate::pagination::Page;
use crate::wrapper::{RawList, ResponseView, WrappingIter, non_empty, opt_string_or_number, string_or_number};

/// One `accountSummaries.list` page.
///
/// The API paginates by index: the next page starts at
/// `startIndex + itemsPerPage` and exists while `nextLink` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummaryList {
    pub kind: Option<String>,
    pub username: Option<String>,
    pub total_results: Option<u32>,
    pub start_index: Option<u32>,
    pub items_per_page: Option<u32>,
    pub previous_link: Option<String>,
    pub next_link: Option<String>,
    #[serde(default)]
    pub items: RawList<AccountSummary>,
}

impl ResponseView for AccountSummaryList {
    const KIND: &'static str = "account summary list";
}

impl Page for AccountSummaryList {
    type Item = AccountSummary;
    /// 1-based start index of the next page.
    type Token = u32;

    fn is_truncated(&self) -> bool {
        non_empty(self.next_link.as_ref()).is_some()
    }

    fn next_token(&self) -> Option<u32> {
        let step = self
            .items_per_page
            .or_else(|| u32::try_from(self.items.len()).ok())
            .filter(|step| *step > 0)?;
        // Past u32::MAX there is nothing left to ask for
        self.start_index.unwrap_or(1).checked_add(step)
    }

    fn into_items(self) -> WrappingIter<AccountSummary, std::vec::IntoIter<Value>> {
        self.items.into_wrapped()
    }
}

/// An account with its web properties.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub starred: Option<bool>,
    #[serde(default)]
    pub web_properties: RawList<WebPropertySummary>,
}

impl ResponseView for AccountSummary {
    const KIND: &'static str = "account summary";
}

/// A tracked site or app.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPropertySummary {
    /// `UA-XXXX-Y`
    pub id: String,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub internal_web_property_id: Option<String>,
    pub level: Option<String>,
    /// Empty for app properties.
    pub website_url: Option<String>,
    pub starred: Option<bool>,
    #[serde(default)]
    pub profiles: RawList<ProfileSummary>,
}

impl ResponseView for WebPropertySummary {
    const KIND: &'static str = "web property summary";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub profile_type: Option<String>,
    pub starred: Option<bool>,
}

impl ResponseView for ProfileSummary {
    const KIND: &'static str = "profile summary";
}

/// A web property together with the account it belongs to.
#[derive(Debug, Clone)]
pub struct AnalyticsProperty {
    pub account_id: String,
    pub account_name: String,
    pub property: WebPropertySummary,
}

impl AnalyticsProperty {
    pub fn new(account: &AccountSummary, property: WebPropertySummary) -> Self {
        Self {
            account_id: account.id.clone(),
            account_name: account.name.clone(),
            property,
        }
    }
}
