//! Column type classification
//!
//! Resolves every column to exactly one `SemanticTag` and a has-missing flag.
//! Typed columns are classified from their declared element type alone;
//! untyped columns are inspected value by value. This is the only place in
//! the pipeline that looks at runtime value types.
//!
//! Rules, in order:
//! 1. Categorical wrappers are unwrapped to their value type
//! 2. Narrow integers -> INTEGER, wide integers and floats -> NUMERIC,
//!    booleans -> LOGICAL, nanosecond timestamps -> DATETIME
//! 3. Anything else is inspected:
//!    - no non-missing entries (zero rows included) -> LOGICAL
//!    - any entry whose type differs from the first non-missing one -> OBJECT
//!    - otherwise rule 2 on that type, text -> CHARACTER, date -> DATE,
//!      date-time -> DATETIME, anything else -> OBJECT

use super::types::SemanticTag;
use crate::data::{Column, DataType, Table};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Versioned type membership table used by the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationTable {
    pub version: u32,
    /// Types that fit an i32 without loss
    pub integer: Vec<DataType>,
    /// Numeric types that would overflow or lose sign as i32
    pub numeric: Vec<DataType>,
    pub logical: Vec<DataType>,
    /// Declared column types classified DATETIME without inspection
    pub timestamp: Vec<DataType>,
    /// Runtime value types classified CHARACTER
    pub character: Vec<DataType>,
    /// Runtime value types classified DATE
    pub date: Vec<DataType>,
    /// Runtime value types classified DATETIME
    pub datetime: Vec<DataType>,
}

impl ClassificationTable {
    pub const V1: u32 = 1;

    pub fn v1() -> Self {
        Self {
            version: Self::V1,
            integer: vec![DataType::Int8, DataType::Int16, DataType::Int32, DataType::UInt8, DataType::UInt16],
            numeric: vec![
                DataType::Int64,
                DataType::UInt32,
                DataType::UInt64,
                DataType::Float32,
                DataType::Float64,
            ],
            logical: vec![DataType::Bool],
            timestamp: vec![DataType::TimestampNs],
            character: vec![DataType::Utf8],
            date: vec![DataType::Date],
            datetime: vec![DataType::DateTime],
        }
    }

    /// Load a table from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// INTEGER / NUMERIC / LOGICAL membership
    fn scalar_tag(&self, dt: &DataType) -> Option<SemanticTag> {
        if self.integer.contains(dt) {
            Some(SemanticTag::Integer)
        } else if self.numeric.contains(dt) {
            Some(SemanticTag::Numeric)
        } else if self.logical.contains(dt) {
            Some(SemanticTag::Logical)
        } else {
            None
        }
    }

    /// Tag for a homogeneous run of values of the given runtime type
    fn runtime_tag(&self, dt: &DataType) -> SemanticTag {
        if let Some(tag) = self.scalar_tag(dt) {
            tag
        } else if self.character.contains(dt) {
            SemanticTag::Character
        } else if self.date.contains(dt) {
            SemanticTag::Date
        } else if self.datetime.contains(dt) {
            SemanticTag::DateTime
        } else {
            SemanticTag::Object
        }
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::v1()
    }
}

/// Classification result for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnClass {
    pub tag: SemanticTag,
    pub has_missing: bool,
}

impl ColumnClass {
    pub fn new(tag: SemanticTag, has_missing: bool) -> Self {
        Self { tag, has_missing }
    }
}

/// Column type classifier
#[derive(Debug, Clone, Default)]
pub struct ColumnClassifier {
    table: ClassificationTable,
}

impl ColumnClassifier {
    pub fn new(table: ClassificationTable) -> Self {
        Self { table }
    }

    /// Classify a single column. Never fails.
    pub fn classify(&self, column: &Column) -> ColumnClass {
        let declared = column.data_type().unwrap_categorical();
        // Computed over the original entries, before any are dropped
        let has_missing = column.has_missing();

        let tag = if let Some(tag) = self.table.scalar_tag(declared) {
            tag
        } else if self.table.timestamp.contains(declared) {
            SemanticTag::DateTime
        } else {
            self.inspect(column)
        };

        log::debug!(
            "Column '{}' ({}) classified as {} (has_missing={})",
            column.name(),
            column.data_type(),
            tag,
            has_missing
        );
        ColumnClass::new(tag, has_missing)
    }

    /// Classify every column of a table, in column order
    pub fn classify_table(&self, table: &Table) -> Vec<ColumnClass> {
        table.columns().iter().map(|c| self.classify(c)).collect()
    }

    fn inspect(&self, column: &Column) -> SemanticTag {
        let mut present = column.non_missing();
        let Some(first) = present.next() else {
            // All-missing or zero rows
            return SemanticTag::Logical;
        };

        let reference = first.runtime_type();
        if present.any(|v| v.runtime_type() != reference) {
            return SemanticTag::Object;
        }
        self.table.runtime_tag(&reference)
    }
}
