//! Parameter map carried by every request and response

use base64::{engine::general_purpose, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// A single parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Plain text
    Text(String),
    /// Integer (amounts in the smallest currency unit, counts, timestamps)
    Int(i64),
    /// Raw bytes, rendered as standard base64
    Bytes(Vec<u8>),
}

impl Value {
    /// Whether the value renders to an empty string
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::Int(_) => false,
            Value::Bytes(b) => b.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Bytes(b) => f.write_str(&general_purpose::STANDARD.encode(b)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Bytes(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

/// Request or response field set.
///
/// Keys are kept in byte order so that wire serialization is deterministic.
/// The canonical signing order is always re-derived by the canonicalizer and
/// does not rely on this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BodyMap {
    entries: BTreeMap<String, Value>,
}

impl BodyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, overwriting any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a field only if it is absent or empty
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        if self.get(&key).map_or(true, Value::is_empty) {
            self.entries.insert(key, value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Rendered value of a field; `None` when absent or empty
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    }

    /// Integer value of a field, parsing text values when needed
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.entries.get(key)? {
            Value::Int(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Bytes(_) => None,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode the map into a typed response.
    ///
    /// Every value is handed to serde as a string, so typed results declare
    /// their fields as `String` / `Option<String>`.
    pub fn decode<T: DeserializeOwned>(&self) -> crate::Result<T> {
        let object: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.to_string())))
            .collect();
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }
}

impl<'a> IntoIterator for &'a BodyMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for BodyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = BodyMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}
