// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store for local development and tests.

use crate::db::{DocumentUpdate, ProfileStore};
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Document store backed by a concurrent map. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Arc<DashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Value>, AppError> {
        Ok(self.documents.get(id).map(|doc| doc.value().clone()))
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        update: &DocumentUpdate,
    ) -> Result<Option<Value>, AppError> {
        Ok(self.documents.get_mut(id).map(|mut doc| {
            update.apply_to(doc.value_mut());
            doc.value().clone()
        }))
    }

    async fn find_all(&self) -> Result<Vec<Value>, AppError> {
        Ok(self
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert(&self, id: &str, document: &Value) -> Result<(), AppError> {
        use dashmap::mapref::entry::Entry;

        match self.documents.entry(id.to_string()) {
            Entry::Occupied(_) => Err(AppError::BadRequest(format!(
                "Document {} already exists",
                id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(document.clone());
                Ok(())
            }
        }
    }
}
