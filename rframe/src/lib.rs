//! rframe core
//!
//! Converts in-memory columnar tables into the value model understood by
//! native R data file writers (RData / Rds).
//! Column types are inferred, mapped to R storage primitives and values are
//! coerced before being handed to a `StorageWriter`.

pub mod data;
pub mod rdata;
pub mod api;

// Re-export main types
pub use data::{Column, DataType, Table, Value};
pub use rdata::{
    CellValue, ClassificationTable, ColumnClass, ColumnClassifier, FileFormat, MemoryWriter,
    SemanticTag, StoragePrimitive, StorageWriter, ValueTransformer, WriteOrchestrator,
    WriteOptions, WrittenObject, NA_INTEGER,
};
pub use api::{write_rdata, write_rds};

/// Conversion and write error type
#[derive(Debug, thiserror::Error)]
pub enum RFrameError {
    // ========== VALIDATION ==========
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid object name: {0}")]
    InvalidName(String),

    #[error("Input is not tabular: {0}")]
    NotTabular(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Column '{column}' row {row}: {found} value in a column declared {declared}")]
    TypeMismatch {
        column: String,
        row: usize,
        declared: String,
        found: String,
    },

    #[error("Invalid format string '{format}': {reason}")]
    InvalidFormat { format: String, reason: String },

    #[error("Unsupported column type for '{column}': {data_type}")]
    UnsupportedType { column: String, data_type: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    // ========== INTERNAL CONSISTENCY ==========
    #[error("Internal consistency fault: {0}")]
    Internal(String),

    // ========== WRITER BOUNDARY ==========
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Writer error: {0}")]
    Writer(String),

    #[error("Cell ({row}, {column}) is outside the declared shape {rows}x{columns}")]
    ShapeMismatch {
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    },

    #[error("Writer call out of order: {0}")]
    OutOfOrder(String),
}

impl RFrameError {
    /// Validation errors are raised before the storage writer is touched
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RFrameError::InvalidPath(_)
                | RFrameError::InvalidName(_)
                | RFrameError::NotTabular(_)
                | RFrameError::DuplicateColumn(_)
                | RFrameError::TypeMismatch { .. }
                | RFrameError::InvalidFormat { .. }
                | RFrameError::UnsupportedType { .. }
                | RFrameError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RFrameError>;
