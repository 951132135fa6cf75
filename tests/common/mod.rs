// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use wellness_tracker::config::Config;
use wellness_tracker::db::{FirestoreDb, MemoryStore, ProfileStore};
use wellness_tracker::routes::create_router;
use wellness_tracker::services::{Notifier, NotifyError, ProfileService};
use wellness_tracker::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Unique id for test isolation.
#[allow(dead_code)]
pub fn unique_user_id() -> String {
    format!("test-{}", uuid::Uuid::new_v4())
}

/// Notifier that records every message it is asked to send.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, address: &str, message: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((address.to_string(), message.to_string()));
        Ok(())
    }
}

/// Notifier whose endpoint is always down.
#[allow(dead_code)]
#[derive(Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _address: &str, _message: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Status(503))
    }
}

/// A test app over the given store and notifier.
#[allow(dead_code)]
pub fn create_app_with(
    store: Arc<dyn ProfileStore>,
    notifier: Arc<dyn Notifier>,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        profiles: ProfileService::new(store),
        notifier,
    });

    (create_router(state.clone()), state)
}

/// Create a test app backed by an in-memory store.
/// Returns the router, the store and the recording notifier.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, MemoryStore, Arc<RecordingNotifier>) {
    let store = MemoryStore::new();
    let notifier = Arc::new(RecordingNotifier::default());
    let (app, _) = create_app_with(Arc::new(store.clone()), notifier.clone());
    (app, store, notifier)
}

/// Create a valid session token for `user_id`.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str) -> String {
    let config = Config::test_default();
    wellness_tracker::middleware::auth::create_jwt(user_id, &config.jwt_signing_key).unwrap()
}

/// Store a user document and return it.
#[allow(dead_code)]
pub async fn seed_user(store: &dyn ProfileStore, user_id: &str, extra: Value) -> Value {
    let mut document = serde_json::json!({
        "id": user_id,
        "name": "Test User",
        "email": "test@example.com",
        "password": "hashed-secret",
    });
    if let (Some(doc), Value::Object(extra)) = (document.as_object_mut(), extra) {
        doc.extend(extra);
    }
    store.insert(user_id, &document).await.unwrap();
    document
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
