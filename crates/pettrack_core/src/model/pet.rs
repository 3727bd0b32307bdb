//! Pet record model.

use serde::{Deserialize, Serialize};

/// Gender code persisted in the `gender` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Integer code stored by the engine.
    pub fn to_db(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Male => 1,
            Self::Female => 2,
        }
    }

    /// Decodes a stored code; unknown codes are rejected, not defaulted.
    pub fn from_db(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }
}

impl Default for Gender {
    fn default() -> Self {
        Self::Unknown
    }
}

/// One pet record.
///
/// `id` is `None` until the storage engine assigns a rowid on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: Option<i64>,
    pub name: String,
    pub breed: Option<String>,
    pub gender: Gender,
    /// Weight in grams; the schema rejects negative values.
    pub weight_grams: u32,
}

impl Pet {
    /// Creates an unpersisted record with no breed and zero weight.
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: None,
            name: name.into(),
            breed: None,
            gender,
            weight_grams: 0,
        }
    }
}
