//! Arrow ingestion
//!
//! Builds a `Table` snapshot from an Arrow `RecordBatch`. Arrow arrays are
//! decoded into host values once, so classification never touches Arrow.

use super::{Column, DataType, Table, Value};
use crate::{RFrameError, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    ArrowTemporalType, DataType as ArrowDataType, Date32Type, Date64Type, Float32Type, Float64Type,
    Int16Type, Int32Type, Int64Type, Int8Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt16Type, UInt32Type,
    UInt64Type, UInt8Type,
};
use arrow::record_batch::RecordBatch;

macro_rules! primitive_values {
    ($array:expr, $arrow_ty:ty, $variant:ident) => {
        $array
            .as_primitive::<$arrow_ty>()
            .iter()
            .map(|v| v.map(Value::$variant).unwrap_or(Value::Null))
            .collect()
    };
}

/// Map an Arrow DataType to the declared host type.
///
/// Returns `None` for Arrow types with no host counterpart.
pub fn arrow_to_data_type(dt: &ArrowDataType) -> Option<DataType> {
    let mapped = match dt {
        ArrowDataType::Boolean => DataType::Bool,
        ArrowDataType::Int8 => DataType::Int8,
        ArrowDataType::Int16 => DataType::Int16,
        ArrowDataType::Int32 => DataType::Int32,
        ArrowDataType::Int64 => DataType::Int64,
        ArrowDataType::UInt8 => DataType::UInt8,
        ArrowDataType::UInt16 => DataType::UInt16,
        ArrowDataType::UInt32 => DataType::UInt32,
        ArrowDataType::UInt64 => DataType::UInt64,
        ArrowDataType::Float16 | ArrowDataType::Float32 => DataType::Float32,
        ArrowDataType::Float64 => DataType::Float64,
        ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 => DataType::Utf8,
        ArrowDataType::Binary | ArrowDataType::LargeBinary => DataType::Binary,
        ArrowDataType::Date32 | ArrowDataType::Date64 => DataType::Date,
        ArrowDataType::Timestamp(_, _) => DataType::TimestampNs,
        ArrowDataType::Dictionary(_, value_type) => {
            DataType::Categorical(Box::new(arrow_to_data_type(value_type)?))
        }
        ArrowDataType::List(_) | ArrowDataType::LargeList(_) => DataType::List,
        ArrowDataType::Null => DataType::Object,
        _ => return None,
    };
    Some(mapped)
}

/// Decode one Arrow array into host values
pub fn array_to_values(array: &dyn Array, column: &str) -> Result<Vec<Value>> {
    let values = match array.data_type() {
        ArrowDataType::Boolean => array
            .as_boolean()
            .iter()
            .map(|v| v.map(Value::Bool).unwrap_or(Value::Null))
            .collect(),
        ArrowDataType::Int8 => primitive_values!(array, Int8Type, Int8),
        ArrowDataType::Int16 => primitive_values!(array, Int16Type, Int16),
        ArrowDataType::Int32 => primitive_values!(array, Int32Type, Int32),
        ArrowDataType::Int64 => primitive_values!(array, Int64Type, Int64),
        ArrowDataType::UInt8 => primitive_values!(array, UInt8Type, UInt8),
        ArrowDataType::UInt16 => primitive_values!(array, UInt16Type, UInt16),
        ArrowDataType::UInt32 => primitive_values!(array, UInt32Type, UInt32),
        ArrowDataType::UInt64 => primitive_values!(array, UInt64Type, UInt64),
        ArrowDataType::Float32 => primitive_values!(array, Float32Type, Float32),
        ArrowDataType::Float64 => primitive_values!(array, Float64Type, Float64),
        ArrowDataType::Float16 => {
            let widened = cast(array, &ArrowDataType::Float32).map_err(|e| unsupported(column, array, e))?;
            primitive_values!(widened, Float32Type, Float32)
        }
        ArrowDataType::Utf8 => array
            .as_string::<i32>()
            .iter()
            .map(|v| v.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null))
            .collect(),
        ArrowDataType::LargeUtf8 => array
            .as_string::<i64>()
            .iter()
            .map(|v| v.map(|s| Value::String(s.to_string())).unwrap_or(Value::Null))
            .collect(),
        ArrowDataType::Binary => array
            .as_binary::<i32>()
            .iter()
            .map(|v| v.map(|b| Value::Binary(b.to_vec())).unwrap_or(Value::Null))
            .collect(),
        ArrowDataType::LargeBinary => array
            .as_binary::<i64>()
            .iter()
            .map(|v| v.map(|b| Value::Binary(b.to_vec())).unwrap_or(Value::Null))
            .collect(),
        ArrowDataType::Date32 => date_values::<Date32Type>(array, column)?,
        ArrowDataType::Date64 => date_values::<Date64Type>(array, column)?,
        // Timezones are dropped: instants are kept as naive UTC wall time
        ArrowDataType::Timestamp(unit, _) => match unit {
            TimeUnit::Second => datetime_values::<TimestampSecondType>(array, column)?,
            TimeUnit::Millisecond => datetime_values::<TimestampMillisecondType>(array, column)?,
            TimeUnit::Microsecond => datetime_values::<TimestampMicrosecondType>(array, column)?,
            TimeUnit::Nanosecond => datetime_values::<TimestampNanosecondType>(array, column)?,
        },
        ArrowDataType::Dictionary(_, value_type) => {
            let decoded = cast(array, value_type).map_err(|e| unsupported(column, array, e))?;
            array_to_values(decoded.as_ref(), column)?
        }
        ArrowDataType::List(_) => {
            let list = array.as_list::<i32>();
            let mut out = Vec::with_capacity(list.len());
            for i in 0..list.len() {
                if list.is_null(i) {
                    out.push(Value::Null);
                } else {
                    out.push(Value::List(array_to_values(list.value(i).as_ref(), column)?));
                }
            }
            out
        }
        ArrowDataType::LargeList(_) => {
            let list = array.as_list::<i64>();
            let mut out = Vec::with_capacity(list.len());
            for i in 0..list.len() {
                if list.is_null(i) {
                    out.push(Value::Null);
                } else {
                    out.push(Value::List(array_to_values(list.value(i).as_ref(), column)?));
                }
            }
            out
        }
        ArrowDataType::Null => vec![Value::Null; array.len()],
        other => {
            return Err(RFrameError::UnsupportedType {
                column: column.to_string(),
                data_type: other.to_string(),
            })
        }
    };
    Ok(values)
}

fn date_values<T>(array: &dyn Array, column: &str) -> Result<Vec<Value>>
where
    T: ArrowTemporalType,
    i64: From<T::Native>,
{
    let arr = array.as_primitive::<T>();
    (0..arr.len())
        .map(|i| {
            if arr.is_null(i) {
                return Ok(Value::Null);
            }
            arr.value_as_date(i)
                .map(Value::Date)
                .ok_or_else(|| out_of_range(column, array, i))
        })
        .collect()
}

fn datetime_values<T>(array: &dyn Array, column: &str) -> Result<Vec<Value>>
where
    T: ArrowTemporalType,
    i64: From<T::Native>,
{
    let arr = array.as_primitive::<T>();
    (0..arr.len())
        .map(|i| {
            if arr.is_null(i) {
                return Ok(Value::Null);
            }
            arr.value_as_datetime(i)
                .map(Value::DateTime)
                .ok_or_else(|| out_of_range(column, array, i))
        })
        .collect()
}

fn out_of_range(column: &str, array: &dyn Array, row: usize) -> RFrameError {
    RFrameError::UnsupportedType {
        column: column.to_string(),
        data_type: format!("{} (value at row {} is outside the representable date range)", array.data_type(), row),
    }
}

fn unsupported(column: &str, array: &dyn Array, err: arrow::error::ArrowError) -> RFrameError {
    RFrameError::UnsupportedType {
        column: column.to_string(),
        data_type: format!("{} ({})", array.data_type(), err),
    }
}

/// Build a host column from a named Arrow array
pub fn column_from_array(name: &str, array: &ArrayRef) -> Result<Column> {
    let data_type = arrow_to_data_type(array.data_type()).ok_or_else(|| RFrameError::UnsupportedType {
        column: name.to_string(),
        data_type: array.data_type().to_string(),
    })?;
    let values = array_to_values(array.as_ref(), name)?;
    Ok(Column::from_values(name, data_type, values))
}

impl TryFrom<&RecordBatch> for Table {
    type Error = RFrameError;

    fn try_from(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut columns = Vec::with_capacity(batch.num_columns());
        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            columns.push(column_from_array(field.name(), array)?);
        }
        Table::with_row_count(columns, batch.num_rows())
    }
}
