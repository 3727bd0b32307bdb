//! Column/value mapping consumed by the write primitives.

use rusqlite::types::Value;

/// Ordered column → value mapping for insert and update operations.
///
/// Putting a column that is already present replaces its value; iteration
/// order is first-put order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowValues {
    entries: Vec<(String, Value)>,
}

impl RowValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `column` to an arbitrary SQL value.
    pub fn put(&mut self, column: &str, value: Value) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == column) {
            entry.1 = value;
        } else {
            self.entries.push((column.to_string(), value));
        }
    }

    pub fn put_text(&mut self, column: &str, value: impl Into<String>) {
        self.put(column, Value::Text(value.into()));
    }

    pub fn put_integer(&mut self, column: &str, value: i64) {
        self.put(column, Value::Integer(value));
    }

    pub fn put_null(&mut self, column: &str) {
        self.put(column, Value::Null);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }
}
