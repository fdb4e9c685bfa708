//! R data conversion pipeline
//!
//! Turns a host `Table` into the call sequence a native R writer expects.
//!
//! # Stages
//!
//! - **Classify**: one `SemanticTag` and a has-missing flag per column
//! - **Map**: tag to one of the four R storage primitives
//! - **Transform**: values to storage-ready `CellValue`s
//! - **Orchestrate**: open, declare schema, insert cells, close
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     write_rdata / write_rds                     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       WriteOrchestrator                         │
//! │  ┌────────────────────────────────────────────────────────────┐ │
//! │  │ ColumnClassifier -> tag_to_primitive -> ValueTransformer   │ │
//! │  └────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  StorageWriter (RData / Rds)                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

// Submodules
mod types;
mod taxonomy;
mod classify;
mod transform;
mod options;
mod writer;
mod memory;

#[cfg(test)]
mod tests;

// Re-exports
pub use types::{CellValue, FileFormat, SemanticTag, StoragePrimitive, NA_INTEGER};
pub use taxonomy::{tag_to_primitive, tags_to_primitives};
pub use classify::{ClassificationTable, ColumnClass, ColumnClassifier};
pub use transform::{parse_format, ValueTransformer};
pub use options::{WriteOptions, DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT, DEFAULT_OBJECT_NAME};
pub use writer::{ColumnPlan, StorageWriter, WriteOrchestrator};
pub use memory::{MemoryWriter, WriterCall, WriterStep, WrittenColumn, WrittenObject};
