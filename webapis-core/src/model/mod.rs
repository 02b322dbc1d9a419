//! Typed views over vendor responses, and the documents the jobs write.

pub mod analytics;
pub mod monitis;
pub mod route53;
pub mod tagmanager;
pub mod template;

pub use analytics::{AccountSummary, AccountSummaryList, AnalyticsProperty, ProfileSummary, WebPropertySummary};
pub use monitis::{Monitor, MonitorParams};
pub use route53::{AliasTarget, HostedZone, HostedZoneList, ResourceRecord, ResourceRecordSet, ResourceRecordSetList};
pub use tagmanager::{AccountContainer, AccountList, Container, ContainerList, TagManagerAccount};
pub use template::{ZoneReference, ZoneTemplate};
