//! Field values attached to log records

use serde::ser::{Error as _, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Key/value map carried by an entry and its record.
pub type Fields = HashMap<String, FieldValue>;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// Message text of an error value
    Error(String),
    /// Arbitrary nested structure
    Nested(serde_json::Value),
    Null,
}

impl FieldValue {
    /// Capture an error as its message text.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        FieldValue::Error(err.to_string())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FieldValue::Error(_))
    }

    /// Errors become plain strings; everything else is cloned as is.
    #[must_use]
    pub fn stringify_error(&self) -> FieldValue {
        match self {
            FieldValue::Error(message) => FieldValue::String(message.clone()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Error(message) => write!(f, "{}", message),
            FieldValue::Nested(value) => write!(f, "{}", value),
            FieldValue::Null => write!(f, "<nil>"),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::String(s) | FieldValue::Error(s) => serializer.serialize_str(s),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::Uint(u) => serializer.serialize_u64(*u),
            FieldValue::Float(fl) if fl.is_finite() => serializer.serialize_f64(*fl),
            // JSON has no representation for NaN or infinities
            FieldValue::Float(fl) => Err(S::Error::custom(format!("unsupported value: {}", fl))),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Nested(value) => value.serialize(serializer),
            FieldValue::Null => serializer.serialize_unit(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::Uint(u)
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        FieldValue::Nested(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}
