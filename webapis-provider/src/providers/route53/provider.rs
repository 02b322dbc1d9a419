//! `Route53Api` implementation

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::traits::{ErrorContext, Route53Api};
use crate::types::RecordSetCursor;

use super::Route53Client;

#[async_trait]
impl Route53Api for Route53Client {
    async fn list_hosted_zones(&self, marker: Option<&str>) -> Result<Value> {
        let mut params = vec![("maxitems".to_string(), self.config.max_items.to_string())];
        if let Some(marker) = marker {
            params.push(("marker".to_string(), marker.to_string()));
        }

        self.get(
            "hostedzone",
            &params,
            "ListHostedZonesResponse",
            ErrorContext::default(),
        )
        .await
    }

    async fn list_resource_record_sets(
        &self,
        zone_id: &str,
        start: Option<&RecordSetCursor>,
    ) -> Result<Value> {
        let mut params = vec![("maxitems".to_string(), self.config.max_items.to_string())];
        if let Some(cursor) = start {
            params.push(("name".to_string(), cursor.name.clone()));
            if let Some(record_type) = &cursor.record_type {
                params.push(("type".to_string(), record_type.clone()));
            }
            if let Some(identifier) = &cursor.identifier {
                params.push(("identifier".to_string(), identifier.clone()));
            }
        }

        self.get(
            &format!("hostedzone/{zone_id}/rrset"),
            &params,
            "ListResourceRecordSetsResponse",
            ErrorContext::resource(zone_id),
        )
        .await
    }
}
