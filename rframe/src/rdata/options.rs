//! Write configuration

use super::classify::ClassificationTable;
use super::transform::parse_format;
use crate::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_OBJECT_NAME: &str = "dataset";

/// Options controlling a write
///
/// Every field has a default, so a partial JSON document such as
/// `{"date_format": "%d.%m.%Y"}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// strftime format for date values
    pub date_format: String,
    /// strftime format for date-time values
    pub datetime_format: String,
    /// Object name inside an RData container
    pub object_name: String,
    /// Type membership table used by the classifier
    pub classification: ClassificationTable,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            object_name: DEFAULT_OBJECT_NAME.to_string(),
            classification: ClassificationTable::default(),
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }

    pub fn with_object_name(mut self, name: impl Into<String>) -> Self {
        self.object_name = name.into();
        self
    }

    pub fn with_classification(mut self, table: ClassificationTable) -> Self {
        self.classification = table;
        self
    }

    /// Load options from JSON, filling unspecified fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check both format strings
    pub fn validate(&self) -> Result<()> {
        parse_format(&self.date_format)?;
        parse_format(&self.datetime_format)?;
        Ok(())
    }
}
