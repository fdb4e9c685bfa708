//! Table snapshot handed to the conversion pipeline

use super::Column;
use crate::{RFrameError, Result};
use ahash::AHashSet;

/// Ordered set of equally long, uniquely named columns
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
    name: Option<String>,
}

impl Table {
    /// Build a table, taking the row count from the first column.
    ///
    /// Fails when columns differ in length, names are empty or repeated, or a
    /// value does not fit its column's declared type.
    pub fn try_new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        Self::with_row_count(columns, row_count)
    }

    /// Build a table with an explicit row count (needed for zero-column tables)
    pub fn with_row_count(columns: Vec<Column>, row_count: usize) -> Result<Self> {
        let mut seen: AHashSet<&str> = AHashSet::with_capacity(columns.len());
        for col in &columns {
            if col.name().is_empty() {
                return Err(RFrameError::NotTabular("column names must not be empty".to_string()));
            }
            if !seen.insert(col.name()) {
                return Err(RFrameError::DuplicateColumn(col.name().to_string()));
            }
            if col.len() != row_count {
                return Err(RFrameError::NotTabular(format!(
                    "all columns must have the same length: '{}' has {} rows, expected {}",
                    col.name(),
                    col.len(),
                    row_count
                )));
            }
            let declared = col.data_type();
            let stray = col
                .values()
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_missing() && !declared.admits(v));
            if let Some((row, value)) = stray {
                return Err(RFrameError::TypeMismatch {
                    column: col.name().to_string(),
                    row,
                    declared: declared.to_string(),
                    found: value.runtime_type().to_string(),
                });
            }
        }

        Ok(Self {
            columns,
            row_count,
            name: None,
        })
    }

    /// Attach a table name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }
}
