//! In-memory storage writer
//!
//! Implements the `StorageWriter` contract without producing bytes. Every
//! precondition of the contract is checked, and the finished object can be
//! read back, which makes this the reference writer for round-trip checks.

use super::types::{CellValue, FileFormat, StoragePrimitive};
use super::writer::StorageWriter;
use crate::{RFrameError, Result};
use std::io;
use std::path::{Path, PathBuf};

/// Writer call, as recorded in the call log
#[derive(Debug, Clone, PartialEq)]
pub enum WriterCall {
    Open { path: PathBuf, format: FileFormat },
    SetRowCount(usize),
    SetTableName(String),
    AddColumn { name: String, primitive: StoragePrimitive },
    InsertValue { row: usize, column: usize },
    Close,
}

/// Step at which a `MemoryWriter` can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterStep {
    Open,
    SetRowCount,
    SetTableName,
    AddColumn,
    InsertValue,
    Close,
}

/// One column as the writer received it
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenColumn {
    pub name: String,
    pub primitive: StoragePrimitive,
    pub values: Vec<CellValue>,
}

/// A finalized object
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenObject {
    pub path: PathBuf,
    pub format: FileFormat,
    /// Object name; always `None` for `FileFormat::Rds`
    pub name: Option<String>,
    pub row_count: usize,
    pub columns: Vec<WrittenColumn>,
}

impl WrittenObject {
    fn new(path: PathBuf, format: FileFormat) -> Self {
        Self {
            path,
            format,
            name: None,
            row_count: 0,
            columns: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&WrittenColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Contract-checking in-memory `StorageWriter`
#[derive(Debug, Default)]
pub struct MemoryWriter {
    /// Object being written, `Some` between open and close
    current: Option<WrittenObject>,
    rows_declared: bool,
    inserted: bool,
    /// Set when a call failed; the object is discarded on close
    poisoned: bool,
    objects: Vec<WrittenObject>,
    calls: Vec<WriterCall>,
    fail_at: Option<WriterStep>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the writer fail the first time it reaches `step`
    pub fn fail_at(mut self, step: WriterStep) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Objects finalized by `close`, oldest first
    pub fn objects(&self) -> &[WrittenObject] {
        &self.objects
    }

    pub fn last(&self) -> Option<&WrittenObject> {
        self.objects.last()
    }

    pub fn into_objects(self) -> Vec<WrittenObject> {
        self.objects
    }

    /// Every call received, in order
    pub fn calls(&self) -> &[WriterCall] {
        &self.calls
    }

    fn check_injected(&mut self, step: WriterStep) -> Result<()> {
        if self.fail_at == Some(step) {
            self.fail_at = None;
            self.poisoned = true;
            return Err(RFrameError::Writer(format!("injected failure at {:?}", step)));
        }
        Ok(())
    }

    fn fail(&mut self, err: RFrameError) -> Result<()> {
        self.poisoned = true;
        Err(err)
    }

    fn current_mut(&mut self, call: &str) -> Result<&mut WrittenObject> {
        if self.current.is_none() {
            self.poisoned = true;
            return Err(RFrameError::OutOfOrder(format!("{} called before open", call)));
        }
        self.current
            .as_mut()
            .ok_or_else(|| RFrameError::Internal("writer state lost".to_string()))
    }
}

impl StorageWriter for MemoryWriter {
    fn open(&mut self, path: &Path, format: FileFormat) -> Result<()> {
        self.calls.push(WriterCall::Open {
            path: path.to_path_buf(),
            format,
        });
        if self.fail_at == Some(WriterStep::Open) {
            self.fail_at = None;
            return Err(RFrameError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("cannot open {} for writing", path.display()),
            )));
        }
        if self.current.is_some() {
            return Err(RFrameError::OutOfOrder("open called while another object is open".to_string()));
        }

        self.current = Some(WrittenObject::new(path.to_path_buf(), format));
        self.rows_declared = false;
        self.inserted = false;
        self.poisoned = false;
        Ok(())
    }

    fn set_row_count(&mut self, rows: usize) -> Result<()> {
        self.calls.push(WriterCall::SetRowCount(rows));
        self.check_injected(WriterStep::SetRowCount)?;
        if self.inserted {
            return self.fail(RFrameError::OutOfOrder("row count declared after insertion".to_string()));
        }
        let current = self.current_mut("set_row_count")?;
        current.row_count = rows;
        for col in &mut current.columns {
            col.values = vec![CellValue::Missing; rows];
        }
        self.rows_declared = true;
        Ok(())
    }

    fn set_table_name(&mut self, name: &str) -> Result<()> {
        self.calls.push(WriterCall::SetTableName(name.to_string()));
        self.check_injected(WriterStep::SetTableName)?;
        let current = self.current_mut("set_table_name")?;
        if current.format.has_object_name() {
            current.name = Some(name.to_string());
        }
        Ok(())
    }

    fn add_column(&mut self, name: &str, primitive: StoragePrimitive) -> Result<()> {
        self.calls.push(WriterCall::AddColumn {
            name: name.to_string(),
            primitive,
        });
        self.check_injected(WriterStep::AddColumn)?;
        let current = self.current_mut("add_column")?;
        let rows = current.row_count;
        current.columns.push(WrittenColumn {
            name: name.to_string(),
            primitive,
            values: vec![CellValue::Missing; rows],
        });
        Ok(())
    }

    fn insert_value(&mut self, row: usize, column: usize, value: &CellValue, primitive: StoragePrimitive) -> Result<()> {
        self.calls.push(WriterCall::InsertValue { row, column });
        self.check_injected(WriterStep::InsertValue)?;
        if !self.rows_declared {
            return self.fail(RFrameError::OutOfOrder("insert_value called before set_row_count".to_string()));
        }

        let current = self.current_mut("insert_value")?;
        let (rows, columns) = (current.row_count, current.columns.len());
        if row >= rows || column >= columns {
            return self.fail(RFrameError::ShapeMismatch {
                row,
                column,
                rows,
                columns,
            });
        }

        let target = &mut current.columns[column];
        if target.primitive != primitive || !value.matches(primitive) {
            let msg = format!(
                "cell ({}, {}) of column '{}' declared {} received {:?} as {}",
                row, column, target.name, target.primitive, value, primitive
            );
            return self.fail(RFrameError::Writer(msg));
        }
        target.values[row] = value.clone();
        self.inserted = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.calls.push(WriterCall::Close);
        let Some(object) = self.current.take() else {
            return Err(RFrameError::OutOfOrder("close called without open".to_string()));
        };
        if self.fail_at == Some(WriterStep::Close) {
            self.fail_at = None;
            return Err(RFrameError::Io(io::Error::new(io::ErrorKind::Other, "flush failed")));
        }
        if self.poisoned {
            log::debug!("Discarding partially written object {}", object.path.display());
            return Ok(());
        }
        self.objects.push(object);
        Ok(())
    }
}
