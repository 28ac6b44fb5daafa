//! Flat key/value parameter sets and their canonical string encoding.
//!
//! Every request sent to the gateways, and every response or callback received from them,
//! is a flat mapping of string keys to values. The *canonical string* of a set is the
//! exact byte sequence that gets signed or verified:
//!
//! - keys with a `null` value are dropped,
//! - the remaining keys are sorted byte-wise,
//! - pairs are joined as `key=value` with `&`, values are **not** percent-escaped.

use crate::Error;
use serde::Serialize;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt};

/// A flat, byte-wise ordered mapping of parameter names to values.
///
/// A `null` value marks an absent parameter: it is kept in the set but excluded
/// from the canonical string and from the wire form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: BTreeMap<String, Value>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Sets a parameter to `value`, or to `null` when `value` is `None`.
    pub fn insert_opt<V: Into<Value>>(
        &mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> &mut Self {
        self.entries
            .insert(key.into(), value.map_or(Value::Null, Into::into));
        self
    }

    /// Builder-style variant of [`insert`](ParameterSet::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the value of `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Returns a copy of this set without the `null`-valued entries.
    pub fn filter_nulls(&self) -> ParameterSet {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Builds the canonical string of this set. See [`encode`].
    pub fn canonical_string(&self) -> String {
        encode(self)
    }

    /// Returns the non-null entries as textual pairs, in canonical order.
    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), value_to_text(v)))
            .collect()
    }

    /// Builds the percent-escaped wire form of this set.
    ///
    /// Decoding the result yields exactly [`canonical_string`](ParameterSet::canonical_string).
    pub fn to_query_string(&self) -> String {
        self.to_form_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Serializes the set (including `null` entries) as a JSON object.
    pub fn to_json_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.entries).map_err(|e| Error::Other(e.into()))
    }

    /// Parses an `application/x-www-form-urlencoded` body, e.g. an asynchronous notification.
    pub fn from_form_urlencoded(body: &str) -> ParameterSet {
        url::form_urlencoded::parse(body.as_bytes())
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect()
    }

    /// Parses a JSON object.
    pub fn from_json_str(body: &str) -> Result<ParameterSet, Error> {
        let map: Map<String, Value> =
            serde_json::from_str(body).map_err(|e| Error::Other(e.into()))?;
        Ok(map.into())
    }

    /// Converts any value serializing to a JSON object into a parameter set.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<ParameterSet, Error> {
        match serde_json::to_value(value).map_err(|e| Error::Other(e.into()))? {
            Value::Object(map) => Ok(map.into()),
            other => Err(Error::InvalidArgument(format!(
                "Expected a JSON object, got: {}",
                other
            ))),
        }
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<Map<String, Value>> for ParameterSet {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds the canonical string of a parameter set.
///
/// `null` values are skipped, keys are sorted byte-wise and values are concatenated verbatim.
/// An empty set yields an empty string.
pub fn encode(params: &ParameterSet) -> String {
    params
        .entries
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| format!("{}={}", k, value_to_text(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Stable textual representation of a parameter value.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        // serde_json maps are ordered by key, so composite values are stable too
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Formats an amount expressed in minor units (fen) as a two-decimal string.
pub fn format_amount(amount_in_minor: u64) -> String {
    format!("{}.{:02}", amount_in_minor / 100, amount_in_minor % 100)
}
