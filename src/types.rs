//! Core types for the record store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Unique identifier for a record.
///
/// Carried in the record's `id` field as either an integer or a string;
/// both round-trip through the backing file as the bare JSON scalar.
/// `1` and `"1"` are distinct ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl RecordId {
    /// Extract an id from a JSON value, if it is a representable scalar.
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            Value::String(s) => Some(RecordId::Str(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<i32> for RecordId {
    fn from(n: i32) -> Self {
        RecordId::Int(n as i64)
    }
}

impl From<u32> for RecordId {
    fn from(n: u32) -> Self {
        RecordId::Int(n as i64)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Str(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Str(s)
    }
}

/// One record as it sits in the backing file: a JSON object with an `id`.
pub type RawRecord = serde_json::Map<String, Value>;

/// Partial field map selecting records by exact field equality.
pub type Query = serde_json::Map<String, Value>;

/// Partial field map shallow-merged into matching records.
pub type Patch = serde_json::Map<String, Value>;
