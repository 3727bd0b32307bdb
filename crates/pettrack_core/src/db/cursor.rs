//! Forward-only result sequence returned by read queries.
//!
//! # Invariants
//! - A cursor is single-pass: consumed rows cannot be revisited.
//! - Cursors are not `Send`; callers share them across threads at their own
//!   peril, so the type forbids it outright.

use rusqlite::types::Value;
use std::rc::Rc;

/// One projected row. Column lookup is by name against the projection the
/// query was executed with.
#[derive(Debug, Clone)]
pub struct RecordRow {
    columns: Rc<[String]>,
    values: Vec<Value>,
}

impl RecordRow {
    /// Raw value for `column`, or `None` when the projection lacks it.
    pub fn value(&self, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|name| name == column)?;
        self.values.get(index)
    }

    /// Integer value for `column`; `None` for nulls, absent columns and
    /// non-integer affinity.
    pub fn integer(&self, column: &str) -> Option<i64> {
        match self.value(column)? {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Text value for `column`; `None` for nulls, absent columns and
    /// non-text affinity.
    pub fn text(&self, column: &str) -> Option<&str> {
        match self.value(column)? {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Finite, forward-only iterator over query results.
#[derive(Debug)]
pub struct RecordCursor {
    columns: Rc<[String]>,
    rows: std::vec::IntoIter<Vec<Value>>,
}

impl RecordCursor {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.into(),
            rows: rows.into_iter(),
        }
    }

    /// Column names of the executed projection, in select order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Iterator for RecordCursor {
    type Item = RecordRow;

    fn next(&mut self) -> Option<Self::Item> {
        let values = self.rows.next()?;
        Some(RecordRow {
            columns: Rc::clone(&self.columns),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RecordCursor;
    use rusqlite::types::Value;

    fn cursor() -> RecordCursor {
        RecordCursor::new(
            vec!["_id".to_string(), "name".to_string()],
            vec![
                vec![Value::Integer(1), Value::Text("Rex".to_string())],
                vec![Value::Integer(2), Value::Null],
            ],
        )
    }

    #[test]
    fn rows_are_consumed_in_order_exactly_once() {
        let mut cursor = cursor();
        assert_eq!(cursor.remaining(), 2);

        let first = cursor.next().unwrap();
        assert_eq!(first.integer("_id"), Some(1));
        assert_eq!(first.text("name"), Some("Rex"));

        let second = cursor.next().unwrap();
        assert_eq!(second.text("name"), None);

        assert!(cursor.next().is_none());
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn lookup_outside_projection_returns_none() {
        let row = cursor().next().unwrap();
        assert_eq!(row.value("breed"), None);
        assert_eq!(row.integer("name"), None);
    }
}
