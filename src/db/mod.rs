// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! User documents are schemaless JSON objects: stored plans may predate the
//! current layout, so the core reads them as raw values and normalizes.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Document store holding user profiles, keyed by user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Get a user document by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Value>, AppError>;

    /// Apply `update` to an existing document and return the result.
    ///
    /// Returns `None` without writing if the document does not exist.
    async fn find_by_id_and_update(
        &self,
        id: &str,
        update: &DocumentUpdate,
    ) -> Result<Option<Value>, AppError>;

    /// Get every user document.
    async fn find_all(&self) -> Result<Vec<Value>, AppError>;

    /// Create a new document.
    async fn insert(&self, id: &str, document: &Value) -> Result<(), AppError>;
}

/// One field write, addressed by its path from the document root.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWrite {
    pub path: Vec<String>,
    pub value: Value,
}

/// A set of field writes applied to one document as a single operation.
///
/// Fields not named keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentUpdate {
    writes: Vec<FieldWrite>,
}

impl DocumentUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a top-level field.
    pub fn set(&mut self, field: &str, value: Value) {
        self.writes.push(FieldWrite {
            path: vec![field.to_string()],
            value,
        });
    }

    /// Replace one key inside a top-level map field, keeping its other keys.
    pub fn set_key(&mut self, field: &str, key: &str, value: Value) {
        self.writes.push(FieldWrite {
            path: vec![field.to_string(), key.to_string()],
            value,
        });
    }

    pub fn writes(&self) -> &[FieldWrite] {
        &self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// True if any write touches `field` (directly or one of its keys).
    pub fn touches(&self, field: &str) -> bool {
        self.writes
            .iter()
            .any(|w| w.path.first().map(String::as_str) == Some(field))
    }

    /// Apply the writes to a document in order.
    ///
    /// Intermediate values that are not objects are replaced by objects.
    pub fn apply_to(&self, document: &mut Value) {
        for write in &self.writes {
            let Some((last, parents)) = write.path.split_last() else {
                continue;
            };

            let mut target = &mut *document;
            for segment in parents {
                target = object_mut(target)
                    .entry(segment.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
            }
            object_mut(target).insert(last.clone(), write.value.clone());
        }
    }
}

fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value
        .as_object_mut()
        .expect("value was just replaced by an object")
}
