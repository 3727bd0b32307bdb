//! URI routing over registered path templates.
//!
//! # Responsibility
//! - Classify incoming content URIs into collection/item/unrecognized routes.
//! - Compile both path templates once at construction.
//!
//! # Invariants
//! - `classify` is a pure function of the URI; no side effects, no state.
//! - A router instance is immutable after construction and is injected into
//!   the store rather than registered globally.

use crate::schema::TableSchema;
use crate::uri::ContentUri;
use regex::Regex;

/// Classification of a content URI against the registered templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Addresses the entire record table.
    Collection,
    /// Addresses exactly one record by primary key.
    Item(i64),
    /// Matches neither registered template.
    Unrecognized,
}

/// Matches content URIs for one table under one authority.
#[derive(Debug, Clone)]
pub struct UriRouter {
    authority: String,
    collection_path: String,
    item_pattern: Regex,
}

impl UriRouter {
    /// Registers the collection and item templates for `schema`.
    pub fn new(authority: impl Into<String>, schema: &TableSchema) -> Self {
        let collection_path = schema.content_path.to_string();
        let item_pattern = Regex::new(&format!(
            "^{}/([0-9]+)$",
            regex::escape(&collection_path)
        ))
        .expect("item route pattern is built from an escaped literal path");

        Self {
            authority: authority.into(),
            collection_path,
            item_pattern,
        }
    }

    /// Classifies `uri` in template precedence order: collection, item,
    /// then unrecognized.
    ///
    /// A numeric trailing segment that overflows `i64` is not a valid row id
    /// and falls through to [`Route::Unrecognized`].
    pub fn classify(&self, uri: &ContentUri) -> Route {
        if uri.authority() != self.authority {
            return Route::Unrecognized;
        }

        let path = uri.path();
        if path == self.collection_path {
            return Route::Collection;
        }

        if let Some(captures) = self.item_pattern.captures(path) {
            if let Ok(id) = captures[1].parse::<i64>() {
                return Route::Item(id);
            }
        }

        Route::Unrecognized
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }
}
