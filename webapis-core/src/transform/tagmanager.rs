//! Tag Manager containers to container-list rows.

use crate::model::tagmanager::AccountContainer;

use super::{FieldSpec, FieldValue, RecordTransformer};

pub const COLUMNS: [&str; 4] = ["Account Id", "Account", "Container Id", "Container"];

/// Counted by account name.
pub fn containers() -> RecordTransformer<AccountContainer> {
    RecordTransformer::new()
        .field(FieldSpec::required("Account Id", |c: &AccountContainer| {
            FieldValue::opt_text(Some(&c.account.account_id))
        }))
        .field(FieldSpec::optional("Account", |c: &AccountContainer| {
            FieldValue::opt_text(Some(&c.account.name))
        }))
        .field(FieldSpec::required("Container Id", |c: &AccountContainer| {
            FieldValue::opt_text(Some(&c.container.container_id))
        }))
        .field(FieldSpec::optional("Container", |c: &AccountContainer| {
            FieldValue::opt_text(c.container.name.as_deref())
        }))
        .count_by(|c: &AccountContainer| c.account.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TypeCounter;
    use crate::wrapper::wrap;
    use serde_json::json;

    #[test]
    fn container_row() {
        let item = AccountContainer {
            account: wrap(json!({"accountId": "42", "name": "Acme"})).unwrap(),
            container: wrap(json!({"containerId": "7", "name": "acme.com", "publicId": "GTM-X"})).unwrap(),
        };

        let mut counter = TypeCounter::new();
        let record = containers().apply(&item, &mut counter).kept().unwrap();
        assert_eq!(record.csv_row(&COLUMNS), vec!["42", "Acme", "7", "acme.com"]);
        assert_eq!(counter.get("Acme"), 1);
    }
}
