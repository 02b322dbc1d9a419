//! Route53 listing views.

use serde::Deserialize;
use serde_json::Value;
use webapis_provider::RecordSetCursor;

use crate::pagination::Page;
use crate::wrapper::{RawList, ResponseView, WrappingIter, non_empty, opt_string_or_number};

/// One `ListHostedZones` page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZoneList {
    #[serde(default)]
    pub hosted_zones: RawList<HostedZone>,
    #[serde(default)]
    pub is_truncated: bool,
    pub next_marker: Option<String>,
    pub marker: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub max_items: Option<String>,
}

impl ResponseView for HostedZoneList {
    const KIND: &'static str = "hosted zone list";
}

impl Page for HostedZoneList {
    type Item = HostedZone;
    type Token = String;

    fn is_truncated(&self) -> bool {
        self.is_truncated
    }

    fn next_token(&self) -> Option<String> {
        non_empty(self.next_marker.as_ref()).map(str::to_string)
    }

    fn into_items(self) -> WrappingIter<HostedZone, std::vec::IntoIter<Value>> {
        self.hosted_zones.into_wrapped()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZoneConfig {
    pub comment: Option<String>,
    #[serde(default)]
    pub private_zone: bool,
}

/// A hosted zone. `Id` and `Name` are required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HostedZone {
    /// Full id, `/hostedzone/Z123`.
    pub id: String,
    /// Fully qualified, with the trailing dot.
    pub name: String,
    pub caller_reference: Option<String>,
    pub config: Option<HostedZoneConfig>,
    pub resource_record_set_count: Option<u64>,
}

impl ResponseView for HostedZone {
    const KIND: &'static str = "hosted zone";
}

impl HostedZone {
    /// The id without its `/hostedzone/` prefix, as the record-set listing expects.
    pub fn short_id(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }
}

/// One `ListResourceRecordSets` page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecordSetList {
    #[serde(default)]
    pub resource_record_sets: RawList<ResourceRecordSet>,
    #[serde(default)]
    pub is_truncated: bool,
    pub next_record_name: Option<String>,
    pub next_record_type: Option<String>,
    pub next_record_identifier: Option<String>,
}

impl ResponseView for ResourceRecordSetList {
    const KIND: &'static str = "record set list";
}

impl Page for ResourceRecordSetList {
    type Item = ResourceRecordSet;
    type Token = RecordSetCursor;

    fn is_truncated(&self) -> bool {
        self.is_truncated
    }

    fn next_token(&self) -> Option<RecordSetCursor> {
        let name = non_empty(self.next_record_name.as_ref())?;
        Some(RecordSetCursor {
            name: name.to_string(),
            record_type: non_empty(self.next_record_type.as_ref()).map(str::to_string),
            identifier: non_empty(self.next_record_identifier.as_ref()).map(str::to_string),
        })
    }

    fn into_items(self) -> WrappingIter<ResourceRecordSet, std::vec::IntoIter<Value>> {
        self.resource_record_sets.into_wrapped()
    }
}

/// A record set. Values and alias target are both optional: a set with neither
/// still wraps.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecordSet {
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "TTL")]
    pub ttl: Option<i64>,
    pub set_identifier: Option<String>,
    pub weight: Option<i64>,
    pub region: Option<String>,
    pub failover: Option<String>,
    pub multi_value_answer: Option<bool>,
    pub health_check_id: Option<String>,
    #[serde(default)]
    pub resource_records: RawList<ResourceRecord>,
    pub alias_target: Option<AliasTarget>,
}

impl ResponseView for ResourceRecordSet {
    const KIND: &'static str = "record set";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecord {
    pub value: Option<String>,
}

impl ResponseView for ResourceRecord {
    const KIND: &'static str = "resource record";
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AliasTarget {
    #[serde(rename = "DNSName")]
    pub dns_name: Option<String>,
    pub hosted_zone_id: Option<String>,
    pub evaluate_target_health: Option<bool>,
}

impl ResponseView for AliasTarget {
    const KIND: &'static str = "alias target";
}
