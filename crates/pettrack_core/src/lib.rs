//! Data-access core for the PetTrack mobile application.
//! Routes content URIs to single-table storage operations.

pub mod db;
pub mod logging;
pub mod model;
pub mod router;
pub mod schema;
pub mod service;
pub mod store;
pub mod uri;

pub use db::cursor::{RecordCursor, RecordRow};
pub use db::values::RowValues;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::pet::{Gender, Pet};
pub use router::{Route, UriRouter};
pub use schema::{TableSchema, CONTENT_AUTHORITY, PETS};
pub use service::pet_service::{PetService, ServiceError, ServiceResult};
pub use store::record_store::{
    QueryDescriptor, RecordStore, SqliteRecordStore, StoreError, StoreResult,
};
pub use uri::{ContentUri, UriError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
