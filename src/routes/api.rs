// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::user::fields;
use crate::services::NormalizedProfile;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const TEST_NOTIFICATION_MESSAGE: &str =
    "This is a test notification. Your reminders will arrive like this.";

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/user/profile", get(get_profile).put(update_profile))
        .route("/api/user/test-notification", post(send_test_notification))
}

// ─── Profile ─────────────────────────────────────────────────

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<NormalizedProfile>> {
    Ok(Json(state.profiles.get_profile(&user.user_id).await?))
}

/// Partial update; the body is taken as raw JSON so unknown or
/// non-updatable fields are dropped rather than rejected.
///
/// A body that is not JSON is a malformed payload like any other.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<NormalizedProfile>> {
    let Json(payload) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    Ok(Json(
        state.profiles.update_profile(&user.user_id, payload).await?,
    ))
}

// ─── Notifications ───────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TestNotificationResponse {
    pub success: bool,
    pub message: String,
}

/// Send a fixed message to the user's address on file.
async fn send_test_notification(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TestNotificationResponse>> {
    let profile = state.profiles.get_profile(&user.user_id).await?;
    let address = profile
        .attributes
        .get(fields::EMAIL)
        .and_then(Value::as_str)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| AppError::Notification("No email address on file".to_string()))?;

    state
        .notifier
        .send(address, TEST_NOTIFICATION_MESSAGE)
        .await
        .map_err(|e| AppError::Notification(e.to_string()))?;

    tracing::info!(user_id = %user.user_id, "Test notification sent");

    Ok(Json(TestNotificationResponse {
        success: true,
        message: "Test notification sent".to_string(),
    }))
}
