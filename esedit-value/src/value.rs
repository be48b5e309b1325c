//! The value model produced by the codec.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Key prefix marking a spread placeholder inside a [`Mapping`].
pub const SPREAD_MARKER: &str = "...";

/// True when `key` is a spread placeholder key (`...expr`).
pub fn is_spread_key(key: &str) -> bool {
    key.starts_with(SPREAD_MARKER)
}

/// Builds the placeholder key for spreading `expr`.
pub fn spread_key(expr: &str) -> String {
    format!("{SPREAD_MARKER}{}", expr.trim())
}

/// A decoded source value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Null,
    Undefined,
    Sequence(Vec<PropertyValue>),
    Mapping(Mapping),
    /// `await import('<module_path>')`
    DynamicImport { module_path: String },
    /// Source text of an expression outside the recognized shapes.
    Opaque(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            PropertyValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The elements as strings, when every element is a string.
    pub fn as_string_list(&self) -> Option<Vec<String>> {
        self.as_sequence()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// A sequence of string values.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PropertyValue::Sequence(
            items
                .into_iter()
                .map(|s| PropertyValue::Str(s.into()))
                .collect(),
        )
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Str(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Str(s)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Number(n as f64)
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        PropertyValue::Number(f64::from(n))
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(items: Vec<PropertyValue>) -> Self {
        PropertyValue::Sequence(items)
    }
}

impl From<Mapping> for PropertyValue {
    fn from(m: Mapping) -> Self {
        PropertyValue::Mapping(m)
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(b),
            Value::Number(n) => PropertyValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => PropertyValue::Str(s),
            Value::Array(items) => {
                PropertyValue::Sequence(items.into_iter().map(PropertyValue::from).collect())
            }
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(Value::String(path)) = map.get("$import") {
                        return PropertyValue::DynamicImport {
                            module_path: path.clone(),
                        };
                    }
                    if let Some(Value::String(expr)) = map.get("$expr") {
                        return PropertyValue::Opaque(expr.clone());
                    }
                }
                PropertyValue::Mapping(
                    map.into_iter()
                        .map(|(k, v)| (k, PropertyValue::from(v)))
                        .collect(),
                )
            }
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Str(s) => serializer.serialize_str(s),
            PropertyValue::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            PropertyValue::Number(n) => serializer.serialize_f64(*n),
            PropertyValue::Bool(b) => serializer.serialize_bool(*b),
            PropertyValue::Null | PropertyValue::Undefined => serializer.serialize_unit(),
            PropertyValue::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            PropertyValue::Mapping(m) => m.serialize(serializer),
            PropertyValue::DynamicImport { module_path } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$import", module_path)?;
                map.end()
            }
            PropertyValue::Opaque(text) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$expr", text)?;
                map.end()
            }
        }
    }
}

/// An ordered string-keyed mapping. Order is authored order, duplicates allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, PropertyValue)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Replaces the first value under `key`, or appends the pair.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Appends the pair without looking for an existing key.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Appends a spread placeholder for `expr`.
    pub fn push_spread(&mut self, expr: &str) {
        self.entries.push((spread_key(expr), PropertyValue::Null));
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Mapping {
    type Item = (String, PropertyValue);
    type IntoIter = std::vec::IntoIter<(String, PropertyValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
