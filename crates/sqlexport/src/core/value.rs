//! Literal value types rendered into INSERT statements.
//!
//! Row sources hand the generator values in this database-agnostic shape;
//! each dialect's `format_value` hook turns them into literal text.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A single cell value as produced by a row source.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    /// Absent/NULL value.
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (covers all integer widths).
    Int(i64),

    /// Floating point value.
    Float(f64),

    /// Decimal value with arbitrary precision.
    Decimal(Decimal),

    /// Text/string data.
    Text(String),

    /// Binary data.
    Bytes(Vec<u8>),

    /// Date without time component.
    Date(NaiveDate),

    /// Time without date component.
    Time(NaiveTime),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),

    /// UUID/GUID value.
    Uuid(Uuid),
}

impl ScriptValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScriptValue::Null)
    }

    /// Textual `true`/`false` check, used by the untyped-boolean formatting
    /// fallback.
    #[must_use]
    pub fn looks_boolean(&self) -> Option<bool> {
        match self {
            ScriptValue::Bool(b) => Some(*b),
            ScriptValue::Text(s) => match s.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<bool> for ScriptValue {
    fn from(v: bool) -> Self {
        ScriptValue::Bool(v)
    }
}

impl From<i32> for ScriptValue {
    fn from(v: i32) -> Self {
        ScriptValue::Int(v as i64)
    }
}

impl From<i64> for ScriptValue {
    fn from(v: i64) -> Self {
        ScriptValue::Int(v)
    }
}

impl From<f64> for ScriptValue {
    fn from(v: f64) -> Self {
        ScriptValue::Float(v)
    }
}

impl From<Decimal> for ScriptValue {
    fn from(v: Decimal) -> Self {
        ScriptValue::Decimal(v)
    }
}

impl From<&str> for ScriptValue {
    fn from(v: &str) -> Self {
        ScriptValue::Text(v.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(v: String) -> Self {
        ScriptValue::Text(v)
    }
}

impl From<Vec<u8>> for ScriptValue {
    fn from(v: Vec<u8>) -> Self {
        ScriptValue::Bytes(v)
    }
}

impl From<Uuid> for ScriptValue {
    fn from(v: Uuid) -> Self {
        ScriptValue::Uuid(v)
    }
}

impl From<NaiveDate> for ScriptValue {
    fn from(v: NaiveDate) -> Self {
        ScriptValue::Date(v)
    }
}

impl From<NaiveTime> for ScriptValue {
    fn from(v: NaiveTime) -> Self {
        ScriptValue::Time(v)
    }
}

impl From<NaiveDateTime> for ScriptValue {
    fn from(v: NaiveDateTime) -> Self {
        ScriptValue::DateTime(v)
    }
}
