//! Declarative record transformation.
//!
//! A [`RecordTransformer`] holds inclusion rules deciding whether a record is
//! kept, and a field table mapping it to an output record. Empty source values
//! never reach the output: [`TransformedRecord::insert`] skips them.

pub mod analytics;
pub mod monitis;
pub mod route53;
pub mod tagmanager;

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One output value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    List(Vec<FieldValue>),
    Map(TransformedRecord),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// `Some(Text)` for a present, non-empty string.
    pub fn opt_text(value: Option<&str>) -> Option<Self> {
        value.filter(|s| !s.is_empty()).map(Self::text)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(record) => record.is_empty(),
            Self::Integer(_) | Self::Bool(_) => false,
        }
    }

    /// Rendering used for a CSV cell.
    pub fn as_csv_cell(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Integer(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::List(items) => items
                .iter()
                .map(Self::as_csv_cell)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Map(record) => record
                .iter()
                .map(|(k, v)| format!("{k}={}", v.as_csv_cell()))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// An output record: field name to value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformedRecord {
    fields: Vec<(String, FieldValue)>,
}

impl TransformedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, unless the value is empty. Returns whether it was stored.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> bool {
        if value.is_empty() {
            return false;
        }
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
        true
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Cells for `columns`; a missing field is an empty cell.
    pub fn csv_row(&self, columns: &[&str]) -> Vec<String> {
        columns
            .iter()
            .map(|c| self.get(c).map(FieldValue::as_csv_cell).unwrap_or_default())
            .collect()
    }
}

impl Serialize for TransformedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

type Extractor<T> = Box<dyn Fn(&T) -> Option<FieldValue> + Send + Sync>;

/// One output column: a name and how to read it from the source record.
pub struct FieldSpec<T> {
    name: &'static str,
    extract: Extractor<T>,
    required: bool,
}

impl<T> FieldSpec<T> {
    /// Left out of the output when empty.
    pub fn optional(
        name: &'static str,
        extract: impl Fn(&T) -> Option<FieldValue> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            extract: Box::new(extract),
            required: false,
        }
    }

    /// Drops the whole record when empty.
    pub fn required(
        name: &'static str,
        extract: impl Fn(&T) -> Option<FieldValue> + Send + Sync + 'static,
    ) -> Self {
        Self {
            required: true,
            ..Self::optional(name, extract)
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A named keep/drop predicate.
pub struct InclusionRule<T> {
    name: &'static str,
    keep: Box<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> InclusionRule<T> {
    pub fn new(name: &'static str, keep: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name,
            keep: Box::new(keep),
        }
    }
}

/// Why a record was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Rejected by the named inclusion rule.
    Excluded(&'static str),
    MissingField(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excluded(rule) => write!(f, "excluded by rule {rule}"),
            Self::MissingField(name) => write!(f, "missing required field {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Keep(TransformedRecord),
    Drop(SkipReason),
}

impl Outcome {
    pub fn kept(self) -> Option<TransformedRecord> {
        match self {
            Self::Keep(record) => Some(record),
            Self::Drop(_) => None,
        }
    }
}

/// Kept-record counts per category (record type, account...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeCounter(BTreeMap<String, usize>);

impl TypeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, category: impl Into<String>) {
        *self.0.entry(category.into()).or_default() += 1;
    }

    pub fn get(&self, category: &str) -> usize {
        self.0.get(category).copied().unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Add every count of `other` into this counter.
    pub fn merge(&mut self, other: &TypeCounter) {
        for (category, count) in other.iter() {
            *self.0.entry(category.to_string()).or_default() += count;
        }
    }
}

/// Maps source records of type `T` to output records.
pub struct RecordTransformer<T> {
    rules: Vec<InclusionRule<T>>,
    fields: Vec<FieldSpec<T>>,
    category: Option<Box<dyn Fn(&T) -> String + Send + Sync>>,
}

impl<T> Default for RecordTransformer<T> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            fields: Vec::new(),
            category: None,
        }
    }
}

impl<T> RecordTransformer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rule(mut self, rule: InclusionRule<T>) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldSpec<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Category a kept record is counted under.
    #[must_use]
    pub fn count_by(mut self, category: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        self.category = Some(Box::new(category));
        self
    }

    /// Output column names, in field-table order.
    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(FieldSpec::name).collect()
    }

    /// Transform one record, counting it in `counter` when kept.
    pub fn apply(&self, item: &T, counter: &mut TypeCounter) -> Outcome {
        if let Some(rule) = self.rules.iter().find(|rule| !(rule.keep)(item)) {
            return Outcome::Drop(SkipReason::Excluded(rule.name));
        }

        let mut record = TransformedRecord::new();
        for field in &self.fields {
            let stored = (field.extract)(item).is_some_and(|value| record.insert(field.name, value));
            if !stored && field.required {
                return Outcome::Drop(SkipReason::MissingField(field.name));
            }
        }

        if let Some(category) = &self.category {
            counter.increment(category(item));
        }
        Outcome::Keep(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        kind: &'static str,
        label: Option<&'static str>,
        note: Option<&'static str>,
    }

    fn transformer() -> RecordTransformer<Row> {
        RecordTransformer::new()
            .rule(InclusionRule::new("no-internal", |r: &Row| r.kind != "internal"))
            .field(FieldSpec::required("Label", |r: &Row| FieldValue::opt_text(r.label)))
            .field(FieldSpec::optional("Note", |r: &Row| FieldValue::opt_text(r.note)))
            .count_by(|r: &Row| r.kind.to_string())
    }

    #[test]
    fn empty_optional_field_is_omitted() {
        let mut counter = TypeCounter::new();
        let outcome = transformer().apply(
            &Row {
                kind: "web",
                label: Some("a"),
                note: Some(""),
            },
            &mut counter,
        );

        let record = outcome.kept().unwrap();
        assert!(record.contains("Label"));
        assert!(!record.contains("Note"));
        assert_eq!(counter.get("web"), 1);
    }

    #[test]
    fn empty_required_field_drops_record() {
        let mut counter = TypeCounter::new();
        let outcome = transformer().apply(
            &Row {
                kind: "web",
                label: None,
                note: Some("n"),
            },
            &mut counter,
        );

        assert_eq!(outcome, Outcome::Drop(SkipReason::MissingField("Label")));
        assert_eq!(SkipReason::MissingField("Label").to_string(), "missing required field Label");
        assert_eq!(counter.total(), 0);
    }

    #[test]
    fn rule_rejection_names_rule() {
        let mut counter = TypeCounter::new();
        let outcome = transformer().apply(
            &Row {
                kind: "internal",
                label: Some("a"),
                note: None,
            },
            &mut counter,
        );
        assert_eq!(outcome, Outcome::Drop(SkipReason::Excluded("no-internal")));
    }

    #[test]
    fn record_serializes_in_insertion_order() {
        let mut record = TransformedRecord::new();
        record.insert("b", FieldValue::text("2"));
        record.insert("a", FieldValue::Integer(1));
        assert!(!record.insert("c", FieldValue::List(Vec::new())));

        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"b":"2","a":1}"#);
        assert_eq!(record.csv_row(&["a", "c", "b"]), vec!["1", "", "2"]);
    }
}
