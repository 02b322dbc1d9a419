//! Google Tag Manager views.
//!
//! Tag Manager pages carry no truncation flag; a `nextPageToken` alone means
//! there is more.

use serde::Deserialize;
use serde_json::Value;

use crate::pagination::Page;
use crate::wrapper::{RawList, ResponseView, WrappingIter, non_empty, string_or_number};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountList {
    #[serde(default)]
    pub account: RawList<TagManagerAccount>,
    pub next_page_token: Option<String>,
}

impl ResponseView for AccountList {
    const KIND: &'static str = "tag manager account list";
}

impl Page for AccountList {
    type Item = TagManagerAccount;
    type Token = String;

    fn is_truncated(&self) -> bool {
        self.next_token().is_some()
    }

    fn next_token(&self) -> Option<String> {
        non_empty(self.next_page_token.as_ref()).map(str::to_string)
    }

    fn into_items(self) -> WrappingIter<TagManagerAccount, std::vec::IntoIter<Value>> {
        self.account.into_wrapped()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagManagerAccount {
    #[serde(deserialize_with = "string_or_number")]
    pub account_id: String,
    pub name: String,
    pub path: Option<String>,
}

impl ResponseView for TagManagerAccount {
    const KIND: &'static str = "tag manager account";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerList {
    #[serde(default)]
    pub container: RawList<Container>,
    pub next_page_token: Option<String>,
}

impl ResponseView for ContainerList {
    const KIND: &'static str = "container list";
}

impl Page for ContainerList {
    type Item = Container;
    type Token = String;

    fn is_truncated(&self) -> bool {
        self.next_token().is_some()
    }

    fn next_token(&self) -> Option<String> {
        non_empty(self.next_page_token.as_ref()).map(str::to_string)
    }

    fn into_items(self) -> WrappingIter<Container, std::vec::IntoIter<Value>> {
        self.container.into_wrapped()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(deserialize_with = "string_or_number")]
    pub container_id: String,
    pub account_id: Option<String>,
    pub name: Option<String>,
    /// `GTM-XXXX`
    pub public_id: Option<String>,
    #[serde(default)]
    pub usage_context: Vec<String>,
}

impl ResponseView for Container {
    const KIND: &'static str = "container";
}

/// A container together with the account it was listed under.
#[derive(Debug, Clone)]
pub struct AccountContainer {
    pub account: TagManagerAccount,
    pub container: Container,
}
