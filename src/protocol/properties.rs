//! Typed client property bag
//!
//! The server attaches a free-form property object to every window. It is
//! validated once at the boundary and carried as a typed map from then on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SurfaceError;

/// One property value. Nested objects are not representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Convert a JSON value. `Ok(None)` means the value was null.
    fn from_json(key: &str, value: &Value) -> Result<Option<Self>, SurfaceError> {
        let converted = match value {
            Value::Null => return Ok(None),
            Value::Bool(b) => PropertyValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Integer(i),
                None => PropertyValue::Float(n.as_f64().ok_or_else(|| invalid(key, "number out of range"))?),
            },
            Value::String(s) => PropertyValue::Text(s.clone()),
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match Self::from_json(key, item)? {
                        Some(v) => list.push(v),
                        None => return Err(invalid(key, "null inside list")),
                    }
                }
                PropertyValue::List(list)
            }
            Value::Object(_) => return Err(invalid(key, "nested objects are not supported")),
        };
        Ok(Some(converted))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Integer(i) => Some(*i as f64),
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn invalid(key: &str, reason: &str) -> SurfaceError {
    SurfaceError::InvalidProperty {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Property map handed to layer surfaces and returned by them
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "serde_json::Value",
    into = "BTreeMap<String, PropertyValue>"
)]
pub struct ClientProperties {
    entries: BTreeMap<String, PropertyValue>,
}

impl ClientProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(PropertyValue::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(PropertyValue::as_i64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl TryFrom<Value> for ClientProperties {
    type Error = SurfaceError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(invalid(
                    "<root>",
                    &format!("expected an object, found {}", json_kind(&other)),
                ))
            }
        };

        let mut entries = BTreeMap::new();
        for (key, value) in &object {
            if let Some(converted) = PropertyValue::from_json(key, value)? {
                entries.insert(key.clone(), converted);
            }
        }
        Ok(Self { entries })
    }
}

impl From<ClientProperties> for BTreeMap<String, PropertyValue> {
    fn from(props: ClientProperties) -> Self {
        props.entries
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
