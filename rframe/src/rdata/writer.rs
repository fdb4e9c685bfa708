//! Write orchestration
//!
//! Drives a `StorageWriter` through the schema-declaration and row-insertion
//! sequence. The orchestrator owns no bytes; it only orders calls.

use super::classify::{ColumnClass, ColumnClassifier};
use super::options::WriteOptions;
use super::taxonomy::tag_to_primitive;
use super::transform::ValueTransformer;
use super::types::{CellValue, FileFormat, StoragePrimitive};
use crate::data::Table;
use crate::Result;
use std::path::Path;

/// Native serializer capability consumed by the orchestrator
///
/// Implementations own the destination handle between `open` and `close`.
pub trait StorageWriter {
    /// Open the destination. Fails with an I/O error if it cannot be written.
    fn open(&mut self, path: &Path, format: FileFormat) -> Result<()>;

    /// Declare the total row count; precedes any insertion
    fn set_row_count(&mut self, rows: usize) -> Result<()>;

    /// Name the object in a container; ignored for `FileFormat::Rds`
    fn set_table_name(&mut self, name: &str) -> Result<()>;

    /// Declare one column. Called once per column, in column order.
    fn add_column(&mut self, name: &str, primitive: StoragePrimitive) -> Result<()>;

    /// Store one cell. `value` already matches `primitive`.
    fn insert_value(&mut self, row: usize, column: usize, value: &CellValue, primitive: StoragePrimitive) -> Result<()>;

    /// Finalize and flush
    fn close(&mut self) -> Result<()>;
}

/// Column schema entry handed to the writer
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    pub name: String,
    pub class: ColumnClass,
    pub primitive: StoragePrimitive,
}

/// Write orchestration implementation
pub struct WriteOrchestrator;

impl WriteOrchestrator {
    /// Classify and map every column, in table order
    pub fn plan(table: &Table, classifier: &ColumnClassifier) -> Vec<ColumnPlan> {
        table
            .columns()
            .iter()
            .map(|col| {
                let class = classifier.classify(col);
                ColumnPlan {
                    name: col.name().to_string(),
                    class,
                    primitive: tag_to_primitive(class.tag),
                }
            })
            .collect()
    }

    /// Write a table through `writer`.
    ///
    /// Formats are validated and columns classified before the writer is
    /// opened. Once open, any failure aborts the sequence; `close` is still
    /// called so the writer can release its handle, and the original error is
    /// returned.
    pub fn write<W: StorageWriter + ?Sized>(
        writer: &mut W,
        path: &Path,
        format: FileFormat,
        table: &Table,
        table_name: &str,
        options: &WriteOptions,
    ) -> Result<()> {
        let transformer = ValueTransformer::new(&options.date_format, &options.datetime_format)?;
        let classifier = ColumnClassifier::new(options.classification.clone());
        let plan = Self::plan(table, &classifier);

        log::info!(
            "Writing {} rows x {} columns to {} ({})",
            table.row_count(),
            table.column_count(),
            path.display(),
            format
        );

        writer.open(path, format)?;
        let result = Self::write_body(writer, table, table_name, &plan, &transformer);

        match result {
            Ok(()) => {
                writer.close()?;
                log::info!("Finished writing {}", path.display());
                Ok(())
            }
            Err(e) => {
                if let Err(close_err) = writer.close() {
                    log::warn!("Failed to close {} after error: {}", path.display(), close_err);
                }
                Err(e)
            }
        }
    }

    fn write_body<W: StorageWriter + ?Sized>(
        writer: &mut W,
        table: &Table,
        table_name: &str,
        plan: &[ColumnPlan],
        transformer: &ValueTransformer<'_>,
    ) -> Result<()> {
        writer.set_row_count(table.row_count())?;
        writer.set_table_name(table_name)?;

        // ========== SCHEMA ==========
        for entry in plan {
            log::debug!("Declaring column '{}' as {}", entry.name, entry.primitive);
            writer.add_column(&entry.name, entry.primitive)?;
        }

        // ========== ROWS ==========
        for (col_idx, (column, entry)) in table.columns().iter().zip(plan).enumerate() {
            let cells = transformer.transform(column, entry.class)?;
            for (row_idx, cell) in cells.iter().enumerate() {
                writer.insert_value(row_idx, col_idx, cell, entry.primitive)?;
            }
        }
        Ok(())
    }
}
