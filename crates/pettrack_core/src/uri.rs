//! Content URI value type.
//!
//! # Responsibility
//! - Parse and render `content://<authority>/<path>` identifiers.
//! - Provide constructors for collection addresses and appended-id handles.
//!
//! # Invariants
//! - A `ContentUri` always carries a non-empty authority.
//! - Parsing never defaults missing parts; malformed input is rejected.

use crate::schema::TableSchema;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// URI scheme accepted by [`ContentUri::parse`].
pub const URI_SCHEME: &str = "content";

pub type UriResult<T> = Result<T, UriError>;

/// Parse failure for content URIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// Input was empty or whitespace only.
    Empty,
    /// Input did not start with `content://`.
    MissingScheme(String),
    /// Input had a scheme but no authority segment.
    MissingAuthority(String),
}

impl Display for UriError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "content uri must not be empty"),
            Self::MissingScheme(input) => {
                write!(f, "content uri `{input}` must start with `{URI_SCHEME}://`")
            }
            Self::MissingAuthority(input) => {
                write!(f, "content uri `{input}` has no authority")
            }
        }
    }
}

impl Error for UriError {}

/// Parsed resource identifier of the form `content://<authority>/<path>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUri {
    authority: String,
    path: String,
}

impl ContentUri {
    /// Parses a textual identifier.
    ///
    /// # Errors
    /// - [`UriError::Empty`] for empty/whitespace input.
    /// - [`UriError::MissingScheme`] when the `content://` prefix is absent.
    /// - [`UriError::MissingAuthority`] when nothing follows the scheme.
    pub fn parse(input: &str) -> UriResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(UriError::Empty);
        }

        let rest = trimmed
            .strip_prefix("content://")
            .ok_or_else(|| UriError::MissingScheme(trimmed.to_string()))?;

        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, path),
            None => (rest, ""),
        };
        if authority.is_empty() {
            return Err(UriError::MissingAuthority(trimmed.to_string()));
        }

        Ok(Self {
            authority: authority.to_string(),
            path: path.to_string(),
        })
    }

    /// Builds the collection address for a table under the given authority.
    pub fn for_collection(authority: impl Into<String>, schema: &TableSchema) -> Self {
        Self {
            authority: authority.into(),
            path: schema.content_path.to_string(),
        }
    }

    /// Returns a new identifier with `id` appended as a trailing path segment.
    ///
    /// Used to build the handle returned by a successful row insert.
    pub fn with_appended_id(&self, id: i64) -> Self {
        Self {
            authority: self.authority.clone(),
            path: format!("{}/{id}", self.path),
        }
    }

    /// Parses the trailing path segment as a non-negative row id.
    pub fn trailing_id(&self) -> Option<i64> {
        let segment = self.path.rsplit('/').next()?;
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        segment.parse::<i64>().ok()
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Display for ContentUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{URI_SCHEME}://{}", self.authority)
        } else {
            write!(f, "{URI_SCHEME}://{}/{}", self.authority, self.path)
        }
    }
}
