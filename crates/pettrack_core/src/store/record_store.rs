//! Record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Expose query/insert/update/delete/content-kind over content URIs.
//! - Apply route-specific selection normalization before touching storage.
//!
//! # Invariants
//! - Item-route deletes always scope to the addressed row id, regardless of
//!   any caller-supplied predicate.
//! - Insert failure reported by the engine is returned as `Ok(None)` after
//!   logging; every other engine error propagates unchanged.

use crate::db::cursor::RecordCursor;
use crate::db::values::RowValues;
use crate::db::{migrations, table, DbError};
use crate::router::{Route, UriRouter};
use crate::schema::{self, TableSchema};
use crate::uri::ContentUri;
use log::error;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error for routing, connection guards and engine failures.
#[derive(Debug)]
pub enum StoreError {
    /// The URI does not route to anything this operation accepts.
    /// A caller contract violation.
    UnsupportedUri {
        operation: &'static str,
        uri: String,
    },
    /// A content kind was requested for a URI the router cannot classify.
    /// Signals an internal routing inconsistency, not caller misuse.
    UnroutableUri { uri: String },
    /// The connection has not been migrated to the expected schema version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// The backing table is missing entirely.
    MissingTable(&'static str),
    /// The backing table lacks a column the store relies on.
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
    Db(DbError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedUri { operation, uri } => {
                write!(f, "cannot {operation} with unsupported uri: {uri}")
            }
            Self::UnroutableUri { uri } => {
                write!(f, "content kind requested for unroutable uri: {uri}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} predates expected {expected_version}; run migrations first"
            ),
            Self::MissingTable(table) => write!(f, "required table `{table}` does not exist"),
            Self::MissingColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read-side query inputs with empty-means-absent semantics.
///
/// Built per call; the store derives an effective descriptor from it when a
/// route requires scoping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescriptor {
    /// Columns to return; empty selects all columns.
    pub projection: Vec<String>,
    /// Predicate template with `?` placeholders; empty matches all rows.
    pub selection: String,
    /// Ordered values substituted into the placeholders.
    pub selection_args: Vec<Value>,
    /// `ORDER BY` body; empty leaves ordering to the engine.
    pub sort_order: String,
}

/// Content-URI-addressed operations over the record table.
pub trait RecordStore {
    /// Reads rows matching `descriptor`, scoped by the URI's route.
    fn query(&self, uri: &ContentUri, descriptor: &QueryDescriptor) -> StoreResult<RecordCursor>;

    /// Creates one row. Returns the handle of the new record, or `None`
    /// when the engine reports the row was not created.
    fn insert(&self, uri: &ContentUri, values: &RowValues) -> StoreResult<Option<ContentUri>>;

    /// Updates matching rows and returns the changed-row count.
    fn update(
        &self,
        uri: &ContentUri,
        values: &RowValues,
        selection: &str,
        selection_args: &[Value],
    ) -> StoreResult<usize>;

    /// Deletes matching rows and returns the removed-row count.
    fn delete(
        &self,
        uri: &ContentUri,
        selection: &str,
        selection_args: &[Value],
    ) -> StoreResult<usize>;

    /// Stable type tag describing what the URI addresses.
    fn content_kind(&self, uri: &ContentUri) -> StoreResult<&'static str>;
}

/// SQLite-backed record store for the `pets` table.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
    router: UriRouter,
    schema: &'static TableSchema,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - [`StoreError::UninitializedConnection`] when the schema version
    ///   predates this binary's migrations.
    /// - [`StoreError::MissingTable`] / [`StoreError::MissingColumn`] when
    ///   the backing table does not match the schema description.
    pub fn try_new(conn: &'conn Connection, router: UriRouter) -> StoreResult<Self> {
        let schema = &schema::PETS;

        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected_version = migrations::latest_version();
        if actual_version < expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", schema.table))?;
        let mut rows = stmt.query([])?;
        let mut present: HashSet<String> = HashSet::new();
        while let Some(row) = rows.next()? {
            present.insert(row.get::<_, String>("name")?);
        }

        if present.is_empty() {
            return Err(StoreError::MissingTable(schema.table));
        }
        for column in schema.columns {
            if !present.contains(*column) {
                return Err(StoreError::MissingColumn {
                    table: schema.table,
                    column,
                });
            }
        }

        Ok(Self {
            conn,
            router,
            schema,
        })
    }

    pub fn router(&self) -> &UriRouter {
        &self.router
    }

    /// Equality predicate on the id column, with `id` as its sole argument.
    fn id_scope(&self, id: i64) -> (String, Vec<Value>) {
        (
            format!("{} = ?", self.schema.id_column),
            vec![Value::Integer(id)],
        )
    }

    /// Fills an empty selection and/or empty argument list with id scoping.
    /// Non-empty caller input is kept as supplied, even if mismatched.
    fn scope_if_empty(
        &self,
        selection: &str,
        selection_args: &[Value],
        id: i64,
    ) -> (String, Vec<Value>) {
        let (id_selection, id_args) = self.id_scope(id);
        let selection = if selection.is_empty() {
            id_selection
        } else {
            selection.to_string()
        };
        let selection_args = if selection_args.is_empty() {
            id_args
        } else {
            selection_args.to_vec()
        };
        (selection, selection_args)
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn query(&self, uri: &ContentUri, descriptor: &QueryDescriptor) -> StoreResult<RecordCursor> {
        let (selection, selection_args) = match self.router.classify(uri) {
            Route::Collection => (
                descriptor.selection.clone(),
                descriptor.selection_args.clone(),
            ),
            Route::Item(id) => {
                self.scope_if_empty(&descriptor.selection, &descriptor.selection_args, id)
            }
            Route::Unrecognized => {
                return Err(StoreError::UnsupportedUri {
                    operation: "query",
                    uri: uri.to_string(),
                });
            }
        };

        let cursor = table::query_rows(
            self.conn,
            self.schema.table,
            &descriptor.projection,
            &selection,
            &selection_args,
            &descriptor.sort_order,
        )?;
        Ok(cursor)
    }

    fn insert(&self, uri: &ContentUri, values: &RowValues) -> StoreResult<Option<ContentUri>> {
        if self.router.classify(uri) != Route::Collection {
            return Err(StoreError::UnsupportedUri {
                operation: "insert",
                uri: uri.to_string(),
            });
        }

        match table::insert_row(self.conn, self.schema.table, values) {
            Ok(row_id) => Ok(Some(uri.with_appended_id(row_id))),
            Err(err) => {
                error!(
                    "event=insert_row module=store status=soft_fail uri={uri} error={err}"
                );
                Ok(None)
            }
        }
    }

    fn update(
        &self,
        uri: &ContentUri,
        values: &RowValues,
        selection: &str,
        selection_args: &[Value],
    ) -> StoreResult<usize> {
        if values.is_empty() {
            return Ok(0);
        }

        let (selection, selection_args) = match self.router.classify(uri) {
            Route::Collection => (selection.to_string(), selection_args.to_vec()),
            Route::Item(id) => self.scope_if_empty(selection, selection_args, id),
            Route::Unrecognized => {
                return Err(StoreError::UnsupportedUri {
                    operation: "update",
                    uri: uri.to_string(),
                });
            }
        };

        let changed = table::update_rows(
            self.conn,
            self.schema.table,
            values,
            &selection,
            &selection_args,
        )?;
        Ok(changed)
    }

    fn delete(
        &self,
        uri: &ContentUri,
        selection: &str,
        selection_args: &[Value],
    ) -> StoreResult<usize> {
        let (selection, selection_args) = match self.router.classify(uri) {
            Route::Collection => (selection.to_string(), selection_args.to_vec()),
            // Item deletes always scope to the addressed row; caller
            // predicates are discarded here, unlike query/update.
            Route::Item(id) => self.id_scope(id),
            Route::Unrecognized => {
                return Err(StoreError::UnsupportedUri {
                    operation: "delete",
                    uri: uri.to_string(),
                });
            }
        };

        let removed =
            table::delete_rows(self.conn, self.schema.table, &selection, &selection_args)?;
        Ok(removed)
    }

    fn content_kind(&self, uri: &ContentUri) -> StoreResult<&'static str> {
        match self.router.classify(uri) {
            Route::Collection => Ok(schema::RECORD_LIST_KIND),
            Route::Item(_) => Ok(schema::RECORD_ITEM_KIND),
            Route::Unrecognized => Err(StoreError::UnroutableUri {
                uri: uri.to_string(),
            }),
        }
    }
}
