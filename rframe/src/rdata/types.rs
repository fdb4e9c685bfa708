//! Type definitions shared by the conversion pipeline
//!
//! Semantic tags, R storage primitives, file format variants and the
//! storage-ready cell values handed to a `StorageWriter`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel standing in for a missing INTEGER or LOGICAL value (R's `NA_integer_`)
pub const NA_INTEGER: i32 = i32::MIN;

/// Semantic classification of a column's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SemanticTag {
    Integer,
    Numeric,
    Logical,
    Character,
    Object,
    Date,
    DateTime,
}

impl SemanticTag {
    pub const ALL: [SemanticTag; 7] = [
        SemanticTag::Integer,
        SemanticTag::Numeric,
        SemanticTag::Logical,
        SemanticTag::Character,
        SemanticTag::Object,
        SemanticTag::Date,
        SemanticTag::DateTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticTag::Integer => "INTEGER",
            SemanticTag::Numeric => "NUMERIC",
            SemanticTag::Logical => "LOGICAL",
            SemanticTag::Character => "CHARACTER",
            SemanticTag::Object => "OBJECT",
            SemanticTag::Date => "DATE",
            SemanticTag::DateTime => "DATETIME",
        }
    }

    /// Parse a tag name (case-insensitive). Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(name))
    }

    /// Tags whose missing entries are encoded with `NA_INTEGER`
    #[inline]
    pub fn uses_sentinel(&self) -> bool {
        matches!(self, SemanticTag::Integer | SemanticTag::Logical)
    }
}

impl fmt::Display for SemanticTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value kinds a native R writer stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoragePrimitive {
    Integer,
    Numeric,
    Logical,
    Character,
}

impl StoragePrimitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoragePrimitive::Integer => "INTEGER",
            StoragePrimitive::Numeric => "NUMERIC",
            StoragePrimitive::Logical => "LOGICAL",
            StoragePrimitive::Character => "CHARACTER",
        }
    }
}

impl fmt::Display for StoragePrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output file variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Container holding a named object among potentially others (.RData)
    RData,
    /// Single unnamed object (.rds)
    Rds,
}

impl FileFormat {
    /// Whether the writer keeps the table name for this variant
    pub fn has_object_name(&self) -> bool {
        matches!(self, FileFormat::RData)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::RData => f.write_str("rdata"),
            FileFormat::Rds => f.write_str("rds"),
        }
    }
}

/// Storage-ready scalar produced by the transformer
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Native NA (CHARACTER / NUMERIC columns and pass-through missing entries)
    Missing,
    /// INTEGER and LOGICAL cells, `NA_INTEGER` included
    Int(i32),
    /// NUMERIC cells at full double precision
    Real(f64),
    /// CHARACTER cells
    Text(String),
}

impl CellValue {
    /// Whether this cell is legal for the given primitive
    pub fn matches(&self, primitive: StoragePrimitive) -> bool {
        match (self, primitive) {
            (CellValue::Missing, _) => true,
            (CellValue::Int(_), StoragePrimitive::Integer | StoragePrimitive::Logical) => true,
            (CellValue::Real(_), StoragePrimitive::Numeric) => true,
            (CellValue::Text(_), StoragePrimitive::Character) => true,
            _ => false,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            CellValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Real(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Missing in the R sense: native NA or the integer sentinel
    pub fn is_na(&self) -> bool {
        matches!(self, CellValue::Missing | CellValue::Int(NA_INTEGER))
    }
}
