//! CloudFormation template describing one hosted zone.
//!
//! Fields serialize in declaration order, which is the key order of the
//! written document.

use serde::Serialize;

use crate::transform::TransformedRecord;

use super::route53::HostedZone;

const FORMAT_VERSION: &str = "2010-09-09";

/// How the record group points back at its zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ZoneReference {
    HostedZoneName(String),
    HostedZoneId(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneTemplate {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: &'static str,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Resources")]
    pub resources: Resources,
}

#[derive(Debug, Clone, Serialize)]
pub struct Resources {
    #[serde(rename = "Zone")]
    pub zone: ZoneResource,
    pub records: RecordSetGroup,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneResource {
    #[serde(rename = "Type")]
    pub resource_type: &'static str,
    pub properties: ZoneProperties,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneProperties {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordSetGroup {
    pub depends_on: &'static str,
    #[serde(rename = "Type")]
    pub resource_type: &'static str,
    pub properties: RecordSetGroupProperties,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordSetGroupProperties {
    #[serde(flatten)]
    pub zone: ZoneReference,
    pub comment: String,
    pub record_sets: Vec<TransformedRecord>,
}

impl ZoneTemplate {
    /// Template for `zone`. With `by_id` the record group references the zone
    /// by id instead of by name.
    pub fn new(zone: &HostedZone, by_id: bool, record_sets: Vec<TransformedRecord>) -> Self {
        let zone_id = zone.short_id();
        let reference = if by_id {
            ZoneReference::HostedZoneId(zone_id.to_string())
        } else {
            ZoneReference::HostedZoneName(zone.name.clone())
        };

        Self {
            format_version: FORMAT_VERSION,
            description: format!("Backup definition for the {} zone", zone.name),
            resources: Resources {
                zone: ZoneResource {
                    resource_type: "AWS::Route53::HostedZone",
                    properties: ZoneProperties {
                        name: zone.name.clone(),
                    },
                },
                records: RecordSetGroup {
                    depends_on: "Zone",
                    resource_type: "AWS::Route53::RecordSetGroup",
                    properties: RecordSetGroupProperties {
                        zone: reference,
                        comment: format!("Zone record for {} HostedZoneId is {zone_id}", zone.name),
                        record_sets,
                    },
                },
            },
        }
    }

    pub fn record_sets(&self) -> &[TransformedRecord] {
        &self.resources.records.properties.record_sets
    }

    /// File name of the template: the zone name followed by `yml`.
    ///
    /// Zone names end with a dot, so `example.com.` gives `example.com.yml`.
    pub fn file_name(&self) -> String {
        format!("{}yml", self.resources.zone.properties.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::FieldValue;
    use crate::wrapper::wrap;
    use serde_json::json;

    fn zone() -> HostedZone {
        wrap(json!({"Id": "/hostedzone/Z123", "Name": "example.com."})).unwrap()
    }

    fn record() -> TransformedRecord {
        let mut record = TransformedRecord::new();
        record.insert("Name", FieldValue::text("example.com."));
        record.insert("Type", FieldValue::text("A"));
        record.insert("TTL", FieldValue::Integer(300));
        record
    }

    #[test]
    fn keys_in_template_order() {
        let template = ZoneTemplate::new(&zone(), false, vec![record()]);
        let value = serde_json::to_value(&template).unwrap();

        assert_eq!(
            value,
            json!({
                "AWSTemplateFormatVersion": "2010-09-09",
                "Description": "Backup definition for the example.com. zone",
                "Resources": {
                    "Zone": {
                        "Type": "AWS::Route53::HostedZone",
                        "Properties": {"Name": "example.com."}
                    },
                    "records": {
                        "DependsOn": "Zone",
                        "Type": "AWS::Route53::RecordSetGroup",
                        "Properties": {
                            "HostedZoneName": "example.com.",
                            "Comment": "Zone record for example.com. HostedZoneId is Z123",
                            "RecordSets": [{"Name": "example.com.", "Type": "A", "TTL": 300}]
                        }
                    }
                }
            })
        );
        assert_eq!(template.file_name(), "example.com.yml");
    }

    #[test]
    fn reference_by_id() {
        let template = ZoneTemplate::new(&zone(), true, Vec::new());
        let value = serde_json::to_value(&template).unwrap();
        let properties = &value["Resources"]["records"]["Properties"];
        assert_eq!(properties["HostedZoneId"], json!("Z123"));
        assert!(properties.get("HostedZoneName").is_none());
    }
}
