//! Monitis monitor views.

use serde::Deserialize;

use crate::wrapper::{ResponseView, opt_string_or_number, string_or_number};

/// A RUM monitor as listed by the custom monitor API.
#[derive(Debug, Clone, Deserialize)]
pub struct Monitor {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub monitor_type: Option<String>,
    pub tag: Option<String>,
    pub url: Option<String>,
    #[serde(alias = "monitorParams")]
    pub params: Option<MonitorParams>,
}

impl ResponseView for Monitor {
    const KIND: &'static str = "monitor";
}

impl Monitor {
    pub fn domain(&self) -> Option<&str> {
        self.params.as_ref().and_then(|p| p.domain.as_deref())
    }

    /// The monitored URL from the params, falling back to the top-level field.
    pub fn monitored_url(&self) -> Option<&str> {
        self.params
            .as_ref()
            .and_then(|p| p.url.as_deref())
            .or(self.url.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorParams {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub url: Option<String>,
}

impl ResponseView for MonitorParams {
    const KIND: &'static str = "monitor params";
}
