//! Shared description of the `pets` table and its content addressing.
//!
//! # Responsibility
//! - Keep table/column identifiers in one place for router and store.
//! - Define the content-kind tags advertised for collection and item routes.
//!
//! # Invariants
//! - `PETS.columns` lists every persisted column in schema order.
//! - `PETS.id_column` is the primary key used for item-route scoping.

/// Canonical authority under which pet records are addressed.
pub const CONTENT_AUTHORITY: &str = "org.pettrack.provider";

/// Primary key column, assigned by the storage engine.
pub const COLUMN_ID: &str = "_id";
/// Pet display name, required non-empty.
pub const COLUMN_NAME: &str = "name";
/// Optional breed text.
pub const COLUMN_BREED: &str = "breed";
/// Gender code, one of [`crate::model::pet::Gender`].
pub const COLUMN_GENDER: &str = "gender";
/// Weight in grams, never negative.
pub const COLUMN_WEIGHT: &str = "weight";

/// Content-kind tag for a collection (list of records) route.
pub const RECORD_LIST_KIND: &str = "vnd.pettrack.dir/pets";
/// Content-kind tag for a single-record route.
pub const RECORD_ITEM_KIND: &str = "vnd.pettrack.item/pets";

/// Static description of one backing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// SQL table name.
    pub table: &'static str,
    /// Path segment under which the table is addressed in content URIs.
    pub content_path: &'static str,
    /// Column scoping item routes to a single row.
    pub id_column: &'static str,
    /// All persisted columns, in schema order.
    pub columns: &'static [&'static str],
}

/// The single table this crate manages.
pub const PETS: TableSchema = TableSchema {
    table: "pets",
    content_path: "pets",
    id_column: COLUMN_ID,
    columns: &[
        COLUMN_ID,
        COLUMN_NAME,
        COLUMN_BREED,
        COLUMN_GENDER,
        COLUMN_WEIGHT,
    ],
};
