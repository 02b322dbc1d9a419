//! Analytics web properties to property-list rows.

use crate::accumulator::derive_identity_key;
use crate::model::analytics::AnalyticsProperty;

use super::{FieldSpec, FieldValue, RecordTransformer};

/// Columns of the property list, in file order.
pub const COLUMNS: [&str; 5] = ["Account Id", "Account", "Properties Id", "Properties", "Without URL"];

/// Properties without a website URL (apps) are dropped. Counted by account name.
pub fn properties() -> RecordTransformer<AnalyticsProperty> {
    RecordTransformer::new()
        .field(FieldSpec::optional("Account Id", |p: &AnalyticsProperty| {
            FieldValue::opt_text(Some(&p.account_id))
        }))
        .field(FieldSpec::optional("Account", |p: &AnalyticsProperty| {
            FieldValue::opt_text(Some(&p.account_name))
        }))
        .field(FieldSpec::optional("Properties Id", |p: &AnalyticsProperty| {
            FieldValue::opt_text(Some(&p.property.id))
        }))
        .field(FieldSpec::required("Properties", |p: &AnalyticsProperty| {
            FieldValue::opt_text(p.property.website_url.as_deref())
        }))
        .field(FieldSpec::optional("Without URL", |p: &AnalyticsProperty| {
            let key = derive_identity_key(p.property.website_url.as_deref()?);
            FieldValue::opt_text(Some(&key))
        }))
        .count_by(|p: &AnalyticsProperty| p.account_name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::analytics::AccountSummary;
    use crate::transform::{Outcome, SkipReason, TypeCounter};
    use crate::wrapper::wrap;
    use serde_json::json;

    fn properties_of(raw: serde_json::Value) -> Vec<AnalyticsProperty> {
        let account: AccountSummary = wrap(raw).unwrap();
        account
            .web_properties
            .iter()
            .map(|p| AnalyticsProperty::new(&account, p.unwrap()))
            .collect()
    }

    #[test]
    fn website_property_becomes_row() {
        let props = properties_of(json!({
            "id": "123",
            "name": "Acme",
            "webProperties": [{"id": "UA-123-1", "websiteUrl": "http://www.acme.com/shop"}]
        }));

        let mut counter = TypeCounter::new();
        let record = properties().apply(&props[0], &mut counter).kept().unwrap();
        assert_eq!(
            record.csv_row(&COLUMNS),
            vec!["123", "Acme", "UA-123-1", "http://www.acme.com/shop", "acme.com"]
        );
        assert_eq!(counter.get("Acme"), 1);
    }

    #[test]
    fn app_property_is_skipped() {
        let props = properties_of(json!({
            "id": "123",
            "name": "Acme",
            "webProperties": [{"id": "UA-123-2", "name": "Acme iOS", "websiteUrl": ""}]
        }));

        let mut counter = TypeCounter::new();
        assert_eq!(
            properties().apply(&props[0], &mut counter),
            Outcome::Drop(SkipReason::MissingField("Properties"))
        );
        assert_eq!(counter.total(), 0);
    }

    #[test]
    fn columns_match_field_table() {
        assert_eq!(properties().columns(), COLUMNS.to_vec());
    }
}
