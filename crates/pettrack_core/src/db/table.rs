//! Generic single-table read/write primitives.
//!
//! # Responsibility
//! - Assemble SQL from projection/selection/sort inputs and bind arguments
//!   positionally.
//! - Keep SQL text out of the store layer.
//!
//! # Invariants
//! - Table and column names come from the schema description; selection
//!   templates carry `?` placeholders matched by the argument list.
//! - An empty selection means "all rows"; an empty projection means "all
//!   columns"; an empty sort order leaves row order to the engine.

use super::cursor::RecordCursor;
use super::values::RowValues;
use super::DbResult;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

/// Runs a read query and materializes the result into a single-pass cursor.
pub fn query_rows(
    conn: &Connection,
    table: &str,
    projection: &[String],
    selection: &str,
    selection_args: &[Value],
    sort_order: &str,
) -> DbResult<RecordCursor> {
    let select_list = if projection.is_empty() {
        "*".to_string()
    } else {
        projection.join(", ")
    };

    let mut sql = format!("SELECT {select_list} FROM {table}");
    if !selection.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(selection);
    }
    if !sort_order.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(sort_order);
    }

    let mut stmt = conn.prepare(&sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let column_count = columns.len();

    let mut rows = stmt.query(params_from_iter(selection_args))?;
    let mut fetched: Vec<Vec<Value>> = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            values.push(row.get::<_, Value>(index)?);
        }
        fetched.push(values);
    }

    Ok(RecordCursor::new(columns, fetched))
}

/// Inserts one row and returns the engine-assigned rowid.
///
/// An empty mapping inserts schema defaults for every column.
pub fn insert_row(conn: &Connection, table: &str, values: &RowValues) -> DbResult<i64> {
    if values.is_empty() {
        conn.execute(&format!("INSERT INTO {table} DEFAULT VALUES;"), [])?;
    } else {
        let columns: Vec<&str> = values.columns().collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders});",
            columns.join(", ")
        );
        conn.execute(&sql, params_from_iter(values.values()))?;
    }

    Ok(conn.last_insert_rowid())
}

/// Updates all rows matching `selection` and returns the changed-row count.
///
/// Callers must not pass an empty mapping; the store layer short-circuits
/// that case before reaching the engine.
pub fn update_rows(
    conn: &Connection,
    table: &str,
    values: &RowValues,
    selection: &str,
    selection_args: &[Value],
) -> DbResult<usize> {
    let assignments: Vec<String> = values
        .columns()
        .map(|column| format!("{column} = ?"))
        .collect();

    let mut sql = format!("UPDATE {table} SET {}", assignments.join(", "));
    if !selection.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(selection);
    }

    let changed = conn.execute(
        &sql,
        params_from_iter(values.values().chain(selection_args.iter())),
    )?;
    Ok(changed)
}

/// Deletes all rows matching `selection` and returns the removed-row count.
///
/// An empty selection deletes every row in the table.
pub fn delete_rows(
    conn: &Connection,
    table: &str,
    selection: &str,
    selection_args: &[Value],
) -> DbResult<usize> {
    let mut sql = format!("DELETE FROM {table}");
    if !selection.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(selection);
    }

    let removed = conn.execute(&sql, params_from_iter(selection_args))?;
    Ok(removed)
}
