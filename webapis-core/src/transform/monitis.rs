//! Monitis monitors to monitor-list rows.

use crate::model::monitis::Monitor;

use super::{FieldSpec, FieldValue, RecordTransformer};

pub const COLUMNS: [&str; 3] = ["Domain", "URL", "Monitor ID"];

/// Counted by monitor type.
pub fn monitors() -> RecordTransformer<Monitor> {
    RecordTransformer::new()
        .field(FieldSpec::optional("Domain", |m: &Monitor| FieldValue::opt_text(m.domain())))
        .field(FieldSpec::optional("URL", |m: &Monitor| {
            FieldValue::opt_text(m.monitored_url())
        }))
        .field(FieldSpec::required("Monitor ID", |m: &Monitor| {
            FieldValue::opt_text(Some(&m.id))
        }))
        .count_by(|m: &Monitor| m.monitor_type.clone().unwrap_or_else(|| "unknown".to_string()))
}
