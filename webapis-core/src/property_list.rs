//! Reading the property list CSV (the analytics dump, or a hand-written file).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::accumulator::{DedupAccumulator, derive_identity_key};
use crate::error::{CoreError, CoreResult};

const REQUIRED_COLUMNS: [&str; 2] = ["Account", "Properties"];

/// One row of the property list. Only `Account` and `Properties` are required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyRow {
    #[serde(rename = "Account")]
    pub account: String,
    /// Website URL; empty for app properties.
    #[serde(rename = "Properties")]
    pub properties: String,
    #[serde(rename = "Without URL", default)]
    pub without_url: Option<String>,
    #[serde(rename = "Account Id", default)]
    pub account_id: Option<String>,
    #[serde(rename = "Properties Id", default)]
    pub property_id: Option<String>,
}

impl PropertyRow {
    pub fn has_url(&self) -> bool {
        !self.properties.trim().is_empty()
    }

    /// The row's domain: from `Without URL` when filled in, else from the URL.
    pub fn identity_key(&self) -> String {
        match self.without_url.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => derive_identity_key(key),
            _ => derive_identity_key(&self.properties),
        }
    }
}

/// Parse a property list from any reader.
pub fn read_property_list_from<R: Read>(reader: R) -> CoreResult<Vec<PropertyRow>> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(reader);

    let headers = csv.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::InvalidInput(format!(
            "property list is missing column(s): {}",
            missing.join(", ")
        )));
    }

    let rows = csv
        .deserialize::<PropertyRow>()
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Read {} property row(s)", rows.len());
    Ok(rows)
}

pub fn read_property_list(path: &Path) -> CoreResult<Vec<PropertyRow>> {
    let file = std::fs::File::open(path).map_err(|e| CoreError::io(path, e))?;
    read_property_list_from(file)
}

/// Website URLs per account, in first-seen order. Rows without a URL are left out.
pub fn group_by_account(rows: &[PropertyRow]) -> DedupAccumulator<String, Vec<String>> {
    let mut grouped = DedupAccumulator::new();
    for row in rows.iter().filter(|row| row.has_url()) {
        grouped
            .entry_or_insert_with(row.account.clone(), Vec::new)
            .push(row.properties.clone());
    }
    grouped
}
