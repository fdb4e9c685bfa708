//! Column definitions and column values

use super::{DataType, Value};

/// A named column of host values with its declared element type
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name (unique within a table)
    name: String,
    /// Declared element type
    data_type: DataType,
    /// Values in row order
    values: Vec<Value>,
}

impl Column {
    /// Create an empty column
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            values: Vec::new(),
        }
    }

    /// Create a column from existing values
    pub fn from_values(name: impl Into<String>, data_type: DataType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            data_type,
            values,
        }
    }

    /// Create an untyped column; element types are resolved at classification time
    pub fn object(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self::from_values(name, DataType::Object, values)
    }

    /// Wrap the declared type in a categorical marker
    pub fn categorical(mut self) -> Self {
        self.data_type = DataType::Categorical(Box::new(self.data_type));
        self
    }

    /// Get the number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the column is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value at the given index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Push a value to the column
    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    /// Push a null value
    pub fn push_null(&mut self) {
        self.values.push(Value::Null);
    }

    /// Get the declared data type
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Get the column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow all values
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Whether any value is missing (null or NaN)
    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Value::is_missing)
    }

    /// Iterate over values that are not missing
    pub fn non_missing(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_missing())
    }
}
