//! Pet use-case service.
//!
//! # Responsibility
//! - Translate `Pet` values to store operations and back.
//! - Reject malformed persisted state instead of masking it.

use crate::db::cursor::RecordRow;
use crate::db::values::RowValues;
use crate::model::pet::{Gender, Pet};
use crate::schema::{self, COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT};
use crate::store::record_store::{QueryDescriptor, RecordStore, StoreError};
use crate::uri::ContentUri;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level error wrapping store failures and row decoding.
#[derive(Debug)]
pub enum ServiceError {
    Store(StoreError),
    /// A persisted row did not decode into a valid `Pet`.
    InvalidRow(String),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidRow(message) => write!(f, "invalid persisted pet row: {message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidRow(_) => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Domain-level CRUD over pet records.
pub struct PetService<S: RecordStore> {
    store: S,
    authority: String,
}

impl<S: RecordStore> PetService<S> {
    pub fn new(store: S, authority: impl Into<String>) -> Self {
        Self {
            store,
            authority: authority.into(),
        }
    }

    /// Persists a new pet and returns its assigned id, or `None` when the
    /// engine refused to create the row.
    pub fn add_pet(&self, pet: &Pet) -> ServiceResult<Option<i64>> {
        let handle = self.store.insert(&self.collection_uri(), &pet_values(pet))?;
        Ok(handle.and_then(|uri| uri.trailing_id()))
    }

    /// Loads one pet by id.
    pub fn pet(&self, id: i64) -> ServiceResult<Option<Pet>> {
        let mut cursor = self
            .store
            .query(&self.item_uri(id), &QueryDescriptor::default())?;
        match cursor.next() {
            Some(row) => Ok(Some(pet_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Lists all pets ordered by name.
    pub fn list_pets(&self) -> ServiceResult<Vec<Pet>> {
        let descriptor = QueryDescriptor {
            sort_order: format!("{COLUMN_NAME} ASC"),
            ..QueryDescriptor::default()
        };
        let cursor = self.store.query(&self.collection_uri(), &descriptor)?;

        let mut pets = Vec::new();
        for row in cursor {
            pets.push(pet_from_row(&row)?);
        }
        Ok(pets)
    }

    /// Sets one pet's weight; returns the changed-row count.
    pub fn set_weight(&self, id: i64, weight_grams: u32) -> ServiceResult<usize> {
        let mut values = RowValues::new();
        values.put_integer(COLUMN_WEIGHT, i64::from(weight_grams));
        let changed = self.store.update(&self.item_uri(id), &values, "", &[])?;
        Ok(changed)
    }

    /// Removes one pet; returns the removed-row count.
    pub fn remove_pet(&self, id: i64) -> ServiceResult<usize> {
        let removed = self.store.delete(&self.item_uri(id), "", &[])?;
        Ok(removed)
    }

    fn collection_uri(&self) -> ContentUri {
        ContentUri::for_collection(&self.authority, &schema::PETS)
    }

    fn item_uri(&self, id: i64) -> ContentUri {
        self.collection_uri().with_appended_id(id)
    }
}

fn pet_values(pet: &Pet) -> RowValues {
    let mut values = RowValues::new();
    values.put_text(COLUMN_NAME, pet.name.clone());
    match &pet.breed {
        Some(breed) => values.put_text(COLUMN_BREED, breed.clone()),
        None => values.put_null(COLUMN_BREED),
    }
    values.put_integer(COLUMN_GENDER, pet.gender.to_db());
    values.put_integer(COLUMN_WEIGHT, i64::from(pet.weight_grams));
    values
}

fn pet_from_row(row: &RecordRow) -> ServiceResult<Pet> {
    let id = row
        .integer(COLUMN_ID)
        .ok_or_else(|| ServiceError::InvalidRow(format!("missing integer `{COLUMN_ID}`")))?;
    let name = row
        .text(COLUMN_NAME)
        .ok_or_else(|| ServiceError::InvalidRow(format!("missing text `{COLUMN_NAME}`")))?
        .to_string();

    let gender_code = row
        .integer(COLUMN_GENDER)
        .ok_or_else(|| ServiceError::InvalidRow(format!("missing integer `{COLUMN_GENDER}`")))?;
    let gender = Gender::from_db(gender_code).ok_or_else(|| {
        ServiceError::InvalidRow(format!("invalid gender code `{gender_code}`"))
    })?;

    let weight = row
        .integer(COLUMN_WEIGHT)
        .ok_or_else(|| ServiceError::InvalidRow(format!("missing integer `{COLUMN_WEIGHT}`")))?;
    let weight_grams = u32::try_from(weight)
        .map_err(|_| ServiceError::InvalidRow(format!("negative weight `{weight}`")))?;

    Ok(Pet {
        id: Some(id),
        name,
        breed: row.text(COLUMN_BREED).map(str::to_string),
        gender,
        weight_grams,
    })
}
