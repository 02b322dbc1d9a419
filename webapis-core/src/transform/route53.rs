//! Record sets to CloudFormation `RecordSets` entries.

use crate::model::route53::{AliasTarget, ResourceRecordSet};

use super::{FieldSpec, FieldValue, InclusionRule, RecordTransformer, TransformedRecord};

/// Records that belong to the zone itself and are recreated with it.
const ZONE_APEX_TYPES: &[&str] = &["SOA", "NS"];

fn alias(target: &AliasTarget) -> FieldValue {
    let mut map = TransformedRecord::new();
    if let Some(v) = FieldValue::opt_text(target.dns_name.as_deref()) {
        map.insert("DNSName", v);
    }
    if let Some(v) = FieldValue::opt_text(target.hosted_zone_id.as_deref()) {
        map.insert("HostedZoneId", v);
    }
    FieldValue::Map(map)
}

fn values(set: &ResourceRecordSet) -> FieldValue {
    FieldValue::List(
        set.resource_records
            .iter()
            .filter_map(Result::ok)
            .filter_map(|r| FieldValue::opt_text(r.value.as_deref()))
            .collect(),
    )
}

/// `SOA` and `NS` sets are dropped unless `with_soa`. Counted by record type.
pub fn record_sets(with_soa: bool) -> RecordTransformer<ResourceRecordSet> {
    let mut transformer = RecordTransformer::new();
    if !with_soa {
        transformer = transformer.rule(InclusionRule::new("zone-apex", |set: &ResourceRecordSet| {
            !ZONE_APEX_TYPES.contains(&set.record_type.as_str())
        }));
    }

    transformer
        .field(FieldSpec::required("Name", |set: &ResourceRecordSet| {
            FieldValue::opt_text(Some(&set.name))
        }))
        .field(FieldSpec::required("Type", |set: &ResourceRecordSet| {
            FieldValue::opt_text(Some(&set.record_type))
        }))
        .field(FieldSpec::optional("TTL", |set: &ResourceRecordSet| {
            set.ttl.filter(|ttl| *ttl > 0).map(FieldValue::Integer)
        }))
        .field(FieldSpec::optional("ResourceRecords", |set: &ResourceRecordSet| {
            Some(values(set))
        }))
        .field(FieldSpec::optional("AliasTarget", |set: &ResourceRecordSet| {
            set.alias_target.as_ref().map(alias)
        }))
        .count_by(|set: &ResourceRecordSet| set.record_type.clone())
}
