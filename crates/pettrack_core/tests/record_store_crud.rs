use pettrack_core::db::migrations::latest_version;
use pettrack_core::db::open_db_in_memory;
use pettrack_core::{
    ContentUri, QueryDescriptor, RecordStore, RowValues, SqliteRecordStore, StoreError, UriRouter,
    CONTENT_AUTHORITY, PETS,
};
use rusqlite::types::Value;
use rusqlite::Connection;

fn router() -> UriRouter {
    UriRouter::new(CONTENT_AUTHORITY, &PETS)
}

fn collection_uri() -> ContentUri {
    ContentUri::for_collection(CONTENT_AUTHORITY, &PETS)
}

fn item_uri(id: i64) -> ContentUri {
    collection_uri().with_appended_id(id)
}

fn unrecognized_uri() -> ContentUri {
    ContentUri::parse(&format!("content://{CONTENT_AUTHORITY}/owners")).unwrap()
}

fn rex_values() -> RowValues {
    let mut values = RowValues::new();
    values.put_text("name", "Rex");
    values.put_text("breed", "Labrador");
    values.put_integer("gender", 1);
    values.put_integer("weight", 9000);
    values
}

#[test]
fn end_to_end_insert_query_update_delete_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();

    let handle = store.insert(&collection_uri(), &rex_values()).unwrap();
    let handle = handle.expect("insert into empty table should create a row");
    assert_eq!(handle, item_uri(1));

    let mut cursor = store
        .query(&item_uri(1), &QueryDescriptor::default())
        .unwrap();
    let row = cursor.next().expect("inserted row should be visible");
    assert_eq!(row.integer("_id"), Some(1));
    assert_eq!(row.text("name"), Some("Rex"));
    assert_eq!(row.text("breed"), Some("Labrador"));
    assert_eq!(row.integer("gender"), Some(1));
    assert_eq!(row.integer("weight"), Some(9000));
    assert!(cursor.next().is_none());

    let mut heavier = RowValues::new();
    heavier.put_integer("weight", 9500);
    let changed = store.update(&item_uri(1), &heavier, "", &[]).unwrap();
    assert_eq!(changed, 1);

    let removed = store.delete(&item_uri(1), "", &[]).unwrap();
    assert_eq!(removed, 1);

    let mut after = store
        .query(&item_uri(1), &QueryDescriptor::default())
        .unwrap();
    assert!(after.next().is_none());
}

#[test]
fn item_query_with_empty_selection_matches_explicit_id_predicate() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();

    store.insert(&collection_uri(), &rex_values()).unwrap();
    let mut other = rex_values();
    other.put_text("name", "Bella");
    store.insert(&collection_uri(), &other).unwrap();

    let implicit: Vec<_> = store
        .query(&item_uri(1), &QueryDescriptor::default())
        .unwrap()
        .map(|row| (row.integer("_id"), row.text("name").map(str::to_string)))
        .collect();

    let explicit_descriptor = QueryDescriptor {
        selection: "_id=?".to_string(),
        selection_args: vec![Value::Integer(1)],
        ..QueryDescriptor::default()
    };
    let explicit: Vec<_> = store
        .query(&item_uri(1), &explicit_descriptor)
        .unwrap()
        .map(|row| (row.integer("_id"), row.text("name").map(str::to_string)))
        .collect();

    assert_eq!(implicit, explicit);
    assert_eq!(implicit.len(), 1);
}

#[test]
fn query_projection_subset_returns_only_requested_columns() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();
    store.insert(&collection_uri(), &rex_values()).unwrap();

    let descriptor = QueryDescriptor {
        projection: vec!["name".to_string(), "weight".to_string()],
        ..QueryDescriptor::default()
    };
    let mut cursor = store.query(&collection_uri(), &descriptor).unwrap();
    assert_eq!(cursor.columns(), ["name", "weight"]);

    let row = cursor.next().unwrap();
    assert_eq!(row.text("name"), Some("Rex"));
    assert_eq!(row.integer("weight"), Some(9000));
    assert_eq!(row.value("_id"), None);
}

#[test]
fn query_on_unrecognized_uri_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();

    let err = store
        .query(&unrecognized_uri(), &QueryDescriptor::default())
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::UnsupportedUri {
            operation: "query",
            ..
        }
    ));
}

#[test]
fn insert_is_rejected_on_item_and_unrecognized_uris() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();

    for uri in [item_uri(1), unrecognized_uri()] {
        let err = store.insert(&uri, &rex_values()).unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnsupportedUri {
                operation: "insert",
                ..
            }
        ));
    }
}

#[test]
fn insert_engine_failure_is_soft_and_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();

    // Empty name violates the schema's non-empty CHECK constraint.
    let mut invalid = rex_values();
    invalid.put_text("name", "");
    let handle = store.insert(&collection_uri(), &invalid).unwrap();
    assert!(handle.is_none());

    let mut negative_weight = rex_values();
    negative_weight.put_integer("weight", -1);
    let handle = store.insert(&collection_uri(), &negative_weight).unwrap();
    assert!(handle.is_none());

    let cursor = store
        .query(&collection_uri(), &QueryDescriptor::default())
        .unwrap();
    assert_eq!(cursor.count(), 0);
}

#[test]
fn update_with_empty_values_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();
    store.insert(&collection_uri(), &rex_values()).unwrap();

    let before = snapshot(&conn);
    let changed = store
        .update(&item_uri(1), &RowValues::new(), "", &[])
        .unwrap();
    assert_eq!(changed, 0);
    assert_eq!(snapshot(&conn), before);
}

#[test]
fn collection_update_applies_to_all_matching_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();
    store.insert(&collection_uri(), &rex_values()).unwrap();
    let mut other = rex_values();
    other.put_text("name", "Bella");
    other.put_integer("gender", 2);
    store.insert(&collection_uri(), &other).unwrap();

    let mut values = RowValues::new();
    values.put_integer("weight", 100);
    let changed = store.update(&collection_uri(), &values, "", &[]).unwrap();
    assert_eq!(changed, 2);

    let changed = store
        .update(
            &collection_uri(),
            &values,
            "gender = ?",
            &[Value::Integer(2)],
        )
        .unwrap();
    assert_eq!(changed, 1);
}

#[test]
fn update_on_unrecognized_uri_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();

    let mut values = RowValues::new();
    values.put_integer("weight", 100);
    let err = store
        .update(&unrecognized_uri(), &values, "", &[])
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::UnsupportedUri {
            operation: "update",
            ..
        }
    ));
}

#[test]
fn item_delete_ignores_caller_selection_and_scopes_to_the_addressed_row() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();
    store.insert(&collection_uri(), &rex_values()).unwrap();
    let mut other = rex_values();
    other.put_text("name", "Bella");
    store.insert(&collection_uri(), &other).unwrap();

    // The caller tries to aim the delete at row 2; the route wins.
    let removed = store
        .delete(&item_uri(1), "_id = ?", &[Value::Integer(2)])
        .unwrap();
    assert_eq!(removed, 1);

    let survivors: Vec<_> = store
        .query(&collection_uri(), &QueryDescriptor::default())
        .unwrap()
        .map(|row| row.integer("_id"))
        .collect();
    assert_eq!(survivors, vec![Some(2)]);
}

#[test]
fn collection_delete_without_selection_removes_all_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();
    store.insert(&collection_uri(), &rex_values()).unwrap();
    store.insert(&collection_uri(), &rex_values()).unwrap();

    let removed = store.delete(&collection_uri(), "", &[]).unwrap();
    assert_eq!(removed, 2);
}

#[test]
fn delete_on_unrecognized_uri_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();

    let err = store.delete(&unrecognized_uri(), "", &[]).unwrap_err();
    assert!(matches!(
        err,
        StoreError::UnsupportedUri {
            operation: "delete",
            ..
        }
    ));
}

#[test]
fn content_kind_tags_for_collection_and_item_routes() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();

    assert_eq!(
        store.content_kind(&collection_uri()).unwrap(),
        "vnd.pettrack.dir/pets"
    );
    assert_eq!(
        store.content_kind(&item_uri(12)).unwrap(),
        "vnd.pettrack.item/pets"
    );
}

#[test]
fn content_kind_on_unroutable_uri_is_a_state_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteRecordStore::try_new(&conn, router()).unwrap();

    let err = store.content_kind(&unrecognized_uri()).unwrap_err();
    assert!(matches!(err, StoreError::UnroutableUri { .. }));
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteRecordStore::try_new(&conn, router());
    match result {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_pets_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteRecordStore::try_new(&conn, router());
    assert!(matches!(result, Err(StoreError::MissingTable("pets"))));
}

#[test]
fn store_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE pets (
            _id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteRecordStore::try_new(&conn, router());
    assert!(matches!(
        result,
        Err(StoreError::MissingColumn {
            table: "pets",
            column: "breed"
        })
    ));
}

fn snapshot(conn: &Connection) -> Vec<(i64, String, Option<String>, i64, i64)> {
    let mut stmt = conn
        .prepare("SELECT _id, name, breed, gender, weight FROM pets ORDER BY _id;")
        .unwrap();
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })
        .unwrap();
    rows.map(Result::unwrap).collect()
}
