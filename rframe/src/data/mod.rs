//! Host data model
//!
//! Tables arrive from the caller as a snapshot of typed columns. Each column
//! carries a declared element type (`DataType`) and a sequence of host values
//! (`Value`). Declared types may be loose (`Object`), in which case the real
//! element types are only known by inspecting the values one by one.

mod column;
mod table;
pub mod arrow_import;

pub use column::Column;
pub use table::Table;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared element type of a column, or runtime type of a single value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
    Binary,
    /// Calendar date without time of day
    Date,
    /// Date with time of day, no timezone
    DateTime,
    /// Nanosecond timestamp column (declared only, values are `Value::DateTime`)
    TimestampNs,
    /// Nested list of values
    List,
    /// Labeled/categorical wrapper around an underlying value type
    Categorical(Box<DataType>),
    /// Untyped column, element types are only known at runtime
    Object,
}

impl DataType {
    /// Strip categorical wrappers down to the underlying value type
    pub fn unwrap_categorical(&self) -> &DataType {
        match self {
            DataType::Categorical(inner) => inner.unwrap_categorical(),
            other => other,
        }
    }

    /// Whether a non-missing value may appear in a column declared with this type
    pub fn admits(&self, value: &Value) -> bool {
        match (self.unwrap_categorical(), value) {
            (DataType::Object, _) => true,
            (DataType::TimestampNs, Value::DateTime(_)) => true,
            (declared, value) => *declared == value.runtime_type(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Categorical(inner) => write!(f, "Categorical<{}>", inner),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A single host value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Binary(Vec<u8>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<Value>),
}

impl Value {
    /// Null and floating NaN both count as missing
    #[inline]
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float32(f) => f.is_nan(),
            Value::Float64(f) => f.is_nan(),
            _ => false,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type of this value. `Null` reports `Object`.
    pub fn runtime_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Object,
            Value::Bool(_) => DataType::Bool,
            Value::Int8(_) => DataType::Int8,
            Value::Int16(_) => DataType::Int16,
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::UInt8(_) => DataType::UInt8,
            Value::UInt16(_) => DataType::UInt16,
            Value::UInt32(_) => DataType::UInt32,
            Value::UInt64(_) => DataType::UInt64,
            Value::Float32(_) => DataType::Float32,
            Value::Float64(_) => DataType::Float64,
            Value::String(_) => DataType::Utf8,
            Value::Binary(_) => DataType::Binary,
            Value::Date(_) => DataType::Date,
            Value::DateTime(_) => DataType::DateTime,
            Value::List(_) => DataType::List,
        }
    }

    /// Convert any numeric or boolean value to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int8(i) => Some(*i as f64),
            Value::Int16(i) => Some(*i as f64),
            Value::Int32(i) => Some(*i as f64),
            Value::Int64(i) => Some(*i as f64),
            Value::UInt8(i) => Some(*i as f64),
            Value::UInt16(i) => Some(*i as f64),
            Value::UInt32(i) => Some(*i as f64),
            Value::UInt64(i) => Some(*i as f64),
            Value::Float32(f) => Some(*f as f64),
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int8(i) => write!(f, "{}", i),
            Value::Int16(i) => write!(f, "{}", i),
            Value::Int32(i) => write!(f, "{}", i),
            Value::Int64(i) => write!(f, "{}", i),
            Value::UInt8(i) => write!(f, "{}", i),
            Value::UInt16(i) => write!(f, "{}", i),
            Value::UInt32(i) => write!(f, "{}", i),
            Value::UInt64(i) => write!(f, "{}", i),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::Binary(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Value::Date(d) => write!(f, "{}", d),
            Value::DateTime(dt) => write!(f, "{}", dt),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
