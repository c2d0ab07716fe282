//! The schemaless transaction record persisted by the record store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::RecordError;

/// One donation event as persisted by the record store.
///
/// The field set is caller-defined and field order is preserved exactly as
/// supplied. The constructors ([`new`](Self::new), [`from_value`](Self::from_value),
/// [`from_slice`](Self::from_slice)) reject empty objects. Deserialization
/// does not, so entries already stored are read back verbatim, `{}` included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord(Map<String, Value>);

impl TransactionRecord {
    /// Wrap a JSON object map, rejecting empty objects.
    pub fn new(fields: Map<String, Value>) -> Result<Self, RecordError> {
        if fields.is_empty() {
            return Err(RecordError::Empty);
        }
        Ok(Self(fields))
    }

    /// Accept an arbitrary JSON value if it is a non-empty object.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(map) => Self::new(map),
            Value::Null => Err(RecordError::Absent),
            other => Err(RecordError::NotAnObject(json_kind(&other))),
        }
    }

    /// Parse a raw request body. Whitespace-only bodies count as absent.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(RecordError::Absent);
        }
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| RecordError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Wrap a map the caller has already checked to be non-empty.
    pub(crate) fn from_fields_unchecked(fields: Map<String, Value>) -> Self {
        debug_assert!(!fields.is_empty());
        Self(fields)
    }

    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a string-valued field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Only a deserialized record can be empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hash = self.get_str("txHash").unwrap_or("-");
        write!(f, "record(txHash={hash}, fields={})", self.0.len())
    }
}

impl TryFrom<Value> for TransactionRecord {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<TransactionRecord> for Value {
    fn from(record: TransactionRecord) -> Self {
        record.into_value()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
