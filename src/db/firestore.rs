// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing [`ProfileStore`].
//!
//! User documents live in the `users` collection with the user id as the
//! document ID. Partial updates are sent with a field mask so only the
//! written fields (or map keys) change.

use crate::db::{collections, DocumentUpdate, FieldWrite, ProfileStore};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

#[async_trait]
impl ProfileStore for FirestoreDb {
    async fn find_by_id(&self, id: &str) -> Result<Option<Value>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        update: &DocumentUpdate,
    ) -> Result<Option<Value>, AppError> {
        // Firestore updates upsert; check first so a deleted user is not recreated.
        let Some(current) = self.find_by_id(id).await? else {
            tracing::warn!(user_id = id, "User not found, skipping update");
            return Ok(None);
        };

        if update.is_empty() {
            return Ok(Some(current));
        }

        let mask: Vec<String> = update.writes().iter().map(field_mask_path).collect();
        let mut patch = Value::Object(Map::new());
        update.apply_to(&mut patch);

        let updated: Value = self
            .get_client()?
            .fluent()
            .update()
            .fields(mask)
            .in_col(collections::USERS)
            .document_id(id)
            .object(&patch)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(
            user_id = id,
            fields = update.writes().len(),
            "User document updated"
        );

        Ok(Some(updated))
    }

    async fn find_all(&self) -> Result<Vec<Value>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert(&self, id: &str, document: &Value) -> Result<(), AppError> {
        let _: Value = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(id)
            .object(document)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

/// Render a write's path as a Firestore field path.
///
/// Segments that are not plain identifiers are backtick-quoted.
fn field_mask_path(write: &FieldWrite) -> String {
    write
        .path
        .iter()
        .map(|segment| quote_segment(segment))
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    let simple = matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric());

    if simple {
        segment.to_string()
    } else {
        let escaped = segment.replace('\\', "\\\\").replace('`', "\\`");
        format!("`{}`", escaped)
    }
}
