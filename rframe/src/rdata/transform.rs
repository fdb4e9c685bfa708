//! Value transformation
//!
//! Rewrites a column's values into cells legal for the storage primitive of
//! its semantic tag. The input column is only borrowed; every call builds a
//! fresh output vector.

use super::classify::ColumnClass;
use super::types::{CellValue, SemanticTag, NA_INTEGER};
use crate::data::{Column, Value};
use crate::{RFrameError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write;

/// Parse a strftime-style format string, rejecting anything chrono cannot render
/// for a naive date-time.
pub fn parse_format(format: &str) -> Result<Vec<Item<'_>>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(RFrameError::InvalidFormat {
            format: format.to_string(),
            reason: "unrecognized specifier".to_string(),
        });
    }

    // Timezone specifiers parse fine but cannot be rendered without an offset
    let probe = NaiveDate::from_ymd_opt(2000, 1, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .ok_or_else(|| RFrameError::Internal("probe date out of range".to_string()))?;
    let mut sink = String::new();
    if write!(sink, "{}", probe.format_with_items(items.iter())).is_err() {
        return Err(RFrameError::InvalidFormat {
            format: format.to_string(),
            reason: "specifier needs timezone information".to_string(),
        });
    }
    Ok(items)
}

/// Column value transformer
///
/// Holds the pre-parsed date and datetime formats so that a table is
/// formatted without re-parsing per column.
pub struct ValueTransformer<'a> {
    date_items: Vec<Item<'a>>,
    datetime_items: Vec<Item<'a>>,
}

impl<'a> ValueTransformer<'a> {
    pub fn new(date_format: &'a str, datetime_format: &'a str) -> Result<Self> {
        Ok(Self {
            date_items: parse_format(date_format)?,
            datetime_items: parse_format(datetime_format)?,
        })
    }

    /// Transform a column with its classification
    pub fn transform(&self, column: &Column, class: ColumnClass) -> Result<Vec<CellValue>> {
        self.transform_values(column.name(), column.values(), class)
    }

    /// Transform raw values. `name` is only used in diagnostics.
    pub fn transform_values(&self, name: &str, values: &[Value], class: ColumnClass) -> Result<Vec<CellValue>> {
        let cells = match class.tag {
            SemanticTag::Integer | SemanticTag::Logical => narrow_column(name, values, class)?,
            SemanticTag::Numeric => values.iter().map(|v| numeric_cell(name, v)).collect::<Result<Vec<_>>>()?,
            SemanticTag::Character => values
                .iter()
                .enumerate()
                .map(|(row, v)| character_cell(name, row, v))
                .collect::<Result<Vec<_>>>()?,
            SemanticTag::Object => values
                .iter()
                .map(|v| if v.is_missing() { CellValue::Missing } else { CellValue::Text(v.to_string()) })
                .collect(),
            SemanticTag::Date => self.format_column(name, values, &self.date_items)?,
            SemanticTag::DateTime => self.format_column(name, values, &self.datetime_items)?,
        };

        log::debug!("Transformed column '{}' as {} ({} cells)", name, class.tag, cells.len());
        Ok(cells)
    }

    fn format_column(&self, name: &str, values: &[Value], items: &[Item<'a>]) -> Result<Vec<CellValue>> {
        let mut out = Vec::with_capacity(values.len());
        for value in values {
            let cell = match value {
                v if v.is_missing() => CellValue::Missing,
                Value::Date(d) => CellValue::Text(format_datetime(&d.and_time(NaiveTime::MIN), items)?),
                Value::DateTime(dt) => CellValue::Text(format_datetime(dt, items)?),
                other => {
                    return Err(RFrameError::Internal(format!(
                        "column '{}' holds {} where a date was expected",
                        name,
                        other.runtime_type()
                    )))
                }
            };
            out.push(cell);
        }
        Ok(out)
    }
}

fn format_datetime(dt: &NaiveDateTime, items: &[Item<'_>]) -> Result<String> {
    let mut buf = String::new();
    write!(buf, "{}", dt.format_with_items(items.iter()))
        .map_err(|_| RFrameError::Internal(format!("failed to format {}", dt)))?;
    Ok(buf)
}

/// Narrow a value to i32 with `as` semantics. Returns (value, overflowed).
fn narrow(value: &Value) -> Option<(i32, bool)> {
    let narrowed = match value {
        Value::Bool(b) => (*b as i32, false),
        Value::Int8(i) => (*i as i32, false),
        Value::Int16(i) => (*i as i32, false),
        Value::Int32(i) => (*i, false),
        Value::UInt8(i) => (*i as i32, false),
        Value::UInt16(i) => (*i as i32, false),
        Value::Int64(i) => (*i as i32, i32::try_from(*i).is_err()),
        Value::UInt32(i) => (*i as i32, i32::try_from(*i).is_err()),
        Value::UInt64(i) => (*i as i32, i32::try_from(*i).is_err()),
        Value::Float32(f) => (*f as i32, (*f as f64) < i32::MIN as f64 || (*f as f64) > i32::MAX as f64),
        Value::Float64(f) => (*f as i32, *f < i32::MIN as f64 || *f > i32::MAX as f64),
        _ => return None,
    };
    Some(narrowed)
}

fn narrow_column(name: &str, values: &[Value], class: ColumnClass) -> Result<Vec<CellValue>> {
    let mut out = Vec::with_capacity(values.len());
    let mut overflowed = 0usize;
    let mut collisions = 0usize;

    for (row, value) in values.iter().enumerate() {
        if class.has_missing && value.is_missing() {
            out.push(CellValue::Int(NA_INTEGER));
            continue;
        }
        let (narrowed, overflow) = narrow(value).ok_or_else(|| {
            RFrameError::Internal(format!(
                "column '{}' row {}: {} cannot be stored as {}",
                name,
                row,
                value.runtime_type(),
                class.tag
            ))
        })?;
        if overflow {
            overflowed += 1;
        }
        if narrowed == NA_INTEGER {
            collisions += 1;
        }
        out.push(CellValue::Int(narrowed));
    }

    if overflowed > 0 {
        log::warn!(
            "Column '{}': {} value(s) outside the 32-bit integer range were narrowed (integers wrap, floats saturate)",
            name,
            overflowed
        );
    }
    if collisions > 0 {
        log::warn!(
            "Column '{}': {} value(s) equal the missing-value sentinel {} and will read back as NA",
            name,
            collisions,
            NA_INTEGER
        );
    }
    Ok(out)
}

fn character_cell(name: &str, row: usize, value: &Value) -> Result<CellValue> {
    match value {
        v if v.is_missing() => Ok(CellValue::Missing),
        Value::String(s) => Ok(CellValue::Text(s.clone())),
        other => Err(RFrameError::Internal(format!(
            "column '{}' row {}: {} cannot be stored as CHARACTER",
            name,
            row,
            other.runtime_type()
        ))),
    }
}

fn numeric_cell(name: &str, value: &Value) -> Result<CellValue> {
    if value.is_null() {
        return Ok(CellValue::Missing);
    }
    value.as_f64().map(CellValue::Real).ok_or_else(|| {
        RFrameError::Internal(format!(
            "column '{}': {} cannot be stored as NUMERIC",
            name,
            value.runtime_type()
        ))
    })
}
