//! Typed read-only views over raw API records.
//!
//! A view is a plain `Deserialize` struct. Required keys are plain fields and
//! are checked once, when [`wrap`] builds the view; every other field is an
//! `Option` or defaults, so a missing key reads as absent rather than failing.
//! Nested collections stay raw ([`RawList`]) and are wrapped one item at a time
//! when iterated.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};

/// A typed view over one raw record.
pub trait ResponseView: DeserializeOwned {
    /// Human-readable name of the record kind, used in error messages.
    const KIND: &'static str;
}

/// Build a view from a raw record, validating its required keys.
pub fn wrap<T: ResponseView>(raw: Value) -> CoreResult<T> {
    serde_json::from_value(raw).map_err(|e| CoreError::MalformedRecord {
        kind: T::KIND,
        detail: e.to_string(),
    })
}

/// Lazily wrap a sequence of raw records.
pub fn wrap_all<T, I>(items: I) -> WrappingIter<T, I::IntoIter>
where
    T: ResponseView,
    I: IntoIterator<Item = Value>,
{
    WrappingIter {
        inner: items.into_iter(),
        _view: PhantomData,
    }
}

/// Iterator that wraps each raw record as it is reached.
///
/// A record that fails validation is yielded as `Err` and iteration goes on with
/// the next one. The iterator cannot be rewound; build a new one to start over.
pub struct WrappingIter<T, I> {
    inner: I,
    _view: PhantomData<fn() -> T>,
}

impl<T, I> Iterator for WrappingIter<T, I>
where
    T: ResponseView,
    I: Iterator<Item = Value>,
{
    type Item = CoreResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(wrap)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, I> ExactSizeIterator for WrappingIter<T, I>
where
    T: ResponseView,
    I: ExactSizeIterator<Item = Value>,
{
}

impl<T, I> fmt::Debug for WrappingIter<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappingIter")
            .field("view", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

/// A nested collection kept raw until iterated.
///
/// Deserialization is lenient: a missing key or `null` is an empty list and a
/// lone object is a one-element list.
pub struct RawList<T> {
    items: Vec<Value>,
    _view: PhantomData<fn() -> T>,
}

impl<T> RawList<T> {
    /// Build from any JSON value with the same leniency as deserialization.
    pub fn from_value(value: Value) -> Self {
        let items = match value {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            other => vec![other],
        };
        Self {
            items,
            _view: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: ResponseView> RawList<T> {
    /// Wrap the items lazily, leaving the list untouched.
    pub fn iter(&self) -> WrappingIter<T, std::iter::Cloned<std::slice::Iter<'_, Value>>> {
        wrap_all(self.items.iter().cloned())
    }

    /// Wrap the items lazily, consuming the list.
    pub fn into_wrapped(self) -> WrappingIter<T, std::vec::IntoIter<Value>> {
        wrap_all(self.items)
    }
}

impl<T> Default for RawList<T> {
    fn default() -> Self {
        Self::from_value(Value::Null)
    }
}

impl<T> Clone for RawList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            _view: PhantomData,
        }
    }
}

impl<T> fmt::Debug for RawList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawList")
            .field("len", &self.items.len())
            .finish()
    }
}

impl<'de, T> Deserialize<'de> for RawList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

/// `Some(s)` only for a present, non-empty string.
pub fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn scalar_to_string<E: serde::de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(E::custom(format!("expected a string or number, got {other}"))),
    }
}

/// Accept a JSON string or number as `String` (ids are sent either way).
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar_to_string::<D::Error>(Value::deserialize(deserializer)?)?
        .ok_or_else(|| serde::de::Error::custom("expected a string or number, got null"))
}

/// Optional variant of [`string_or_number`]; `null` reads as `None`.
pub fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    scalar_to_string::<D::Error>(Value::deserialize(deserializer)?)
}
