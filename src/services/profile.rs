// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile read/update service.
//!
//! Reads always return the normalized shape: every day-keyed collection has
//! all seven days and meal days have their five slots. Updates accept only
//! allow-listed fields and are written as a single document update.

use crate::db::{DocumentUpdate, ProfileStore};
use crate::error::{AppError, Result};
use crate::models::schedule::{MealSlot, WeekSchedule};
use crate::models::user::{fields, NewProfile};
use crate::services::metrics;
use crate::services::normalizer::{fill_days, to_record, to_storage_shape, validate_weekly_plans};
use crate::time_utils::format_utc_rfc3339;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use validator::Validate;

/// Fields a client may write through [`ProfileService::update_profile`].
///
/// Identity, credential, computed metrics and timestamps are not listed.
pub const UPDATABLE_FIELDS: [&str; 12] = [
    fields::WEIGHT,
    fields::HEIGHT,
    fields::AGE,
    fields::GENDER,
    fields::ACTIVITY,
    fields::FITNESS_GOAL,
    fields::WEEKLY_PLANS,
    fields::FITNESS_PLANS,
    fields::MEAL_PLANS,
    fields::REMINDERS,
    fields::TODOS,
    fields::COMPLETED,
];

/// Profile as returned to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProfile {
    pub id: String,
    pub weekly_plans: WeekSchedule,
    pub fitness_plans: WeekSchedule,
    pub meal_plans: WeekSchedule,
    /// Every other stored field except the credential.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Service for reading and updating user profiles.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Get a user's normalized profile.
    pub async fn get_profile(&self, user_id: &str) -> Result<NormalizedProfile> {
        let document = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found(user_id))?;

        Ok(normalize_profile(user_id, document))
    }

    /// Apply the allow-listed part of `payload` and return the stored result.
    ///
    /// Fields absent from the payload keep their stored value. For fitness
    /// and meal plans only the submitted days are written.
    pub async fn update_profile(&self, user_id: &str, payload: Value) -> Result<NormalizedProfile> {
        let Value::Object(payload) = payload else {
            return Err(AppError::MalformedPayload(
                "profile update must be a JSON object".to_string(),
            ));
        };

        let current = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found(user_id))?;

        let now = format_utc_rfc3339(chrono::Utc::now());
        let update = build_update(&current, payload, &now);

        let updated = self
            .store
            .find_by_id_and_update(user_id, &update)
            .await?
            .ok_or_else(|| not_found(user_id))?;

        tracing::info!(user_id, writes = update.writes().len(), "Profile updated");

        Ok(normalize_profile(user_id, updated))
    }

    /// Create the stored profile for a newly signed-up user.
    ///
    /// `credential` is stored as given and never returned.
    pub async fn create_profile(
        &self,
        profile: NewProfile,
        credential: &str,
    ) -> Result<NormalizedProfile> {
        profile
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let user_id = uuid::Uuid::new_v4().to_string();
        let now = format_utc_rfc3339(chrono::Utc::now());
        let document = profile
            .into_document(&user_id, credential, &now)
            .map_err(|e| AppError::Internal(e.into()))?;

        self.store.insert(&user_id, &document).await?;
        tracing::info!(user_id = %user_id, "Profile created");

        Ok(normalize_profile(&user_id, document))
    }
}

fn not_found(user_id: &str) -> AppError {
    AppError::NotFound(format!("User {} not found", user_id))
}

/// Shape a stored document for callers.
///
/// The credential is dropped, the three day-keyed collections are filled to
/// seven days, and `reminders`/`todos` are always sequences.
pub fn normalize_profile(user_id: &str, document: Value) -> NormalizedProfile {
    let mut attributes = match document {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    attributes.remove(fields::PASSWORD);

    let id = match attributes.remove(fields::ID) {
        Some(Value::String(id)) => id,
        _ => user_id.to_string(),
    };

    let weekly_plans = fill_days(attributes.remove(fields::WEEKLY_PLANS).as_ref(), &[]);

    let fitness_record = Value::Object(to_record(attributes.remove(fields::FITNESS_PLANS).as_ref()));
    let fitness_plans = fill_days(Some(&fitness_record), &[]);

    let meal_record = Value::Object(to_record(attributes.remove(fields::MEAL_PLANS).as_ref()));
    let meal_plans = fill_days(Some(&meal_record), &MealSlot::empty_day());

    for field in [fields::REMINDERS, fields::TODOS] {
        let entry = attributes
            .entry(field)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
    }

    NormalizedProfile {
        id,
        weekly_plans,
        fitness_plans,
        meal_plans,
        attributes,
    }
}

/// Turn a client payload into the single write for this update.
///
/// `current` is the stored document; it decides how map-shaped plans are
/// written and supplies the other inputs when metrics are recomputed.
pub fn build_update(current: &Value, payload: Map<String, Value>, now: &str) -> DocumentUpdate {
    let mut update = DocumentUpdate::new();

    for (field, mut value) in payload {
        if !UPDATABLE_FIELDS.contains(&field.as_str()) {
            tracing::debug!(field = %field, "Ignoring non-updatable profile field");
            continue;
        }

        match field.as_str() {
            fields::WEEKLY_PLANS => {
                validate_weekly_plans(&mut value);
                update.set(&field, value);
            }
            fields::FITNESS_PLANS | fields::MEAL_PLANS => {
                write_storage_days(&mut update, &field, current.get(&field), &value);
            }
            fields::REMINDERS => update.set(&field, with_reminder_ids(value)),
            fields::TODOS => update.set(&field, into_sequence(value)),
            _ => update.set(&field, value),
        }
    }

    if metrics::METRIC_INPUTS.iter().any(|f| update.touches(f)) {
        let mut merged = current.clone();
        update.apply_to(&mut merged);
        if let Some(computed) = merged.as_object().and_then(metrics::compute) {
            update.set(fields::BMI, Value::String(computed.bmi));
            update.set(fields::BMR, Value::String(computed.bmr));
            update.set(fields::DAILY_CALORIES, Value::String(computed.daily_calories));
        }
    }

    update.set(fields::UPDATED_AT, Value::String(now.to_string()));
    update
}

/// Write the submitted days of a map-shaped plan.
///
/// When the stored container is already a record each submitted day is
/// written on its own. Otherwise the stored days are converted to a record,
/// merged with the submitted ones and the whole field is rewritten.
fn write_storage_days(
    update: &mut DocumentUpdate,
    field: &str,
    stored: Option<&Value>,
    submitted: &Value,
) {
    let submitted = match submitted {
        Value::Object(record) => to_storage_shape(record),
        _ => Default::default(),
    };

    match stored {
        Some(Value::Object(_)) => {
            for (day, entries) in submitted {
                update.set_key(field, &day, Value::Array(entries));
            }
        }
        stored => {
            let mut record = to_record(stored);
            for (day, entries) in submitted {
                record.insert(day, Value::Array(entries));
            }
            update.set(field, Value::Object(record));
        }
    }
}

fn into_sequence(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        _ => Value::Array(Vec::new()),
    }
}

/// Give every reminder object without an id a fresh one.
fn with_reminder_ids(value: Value) -> Value {
    let Value::Array(mut reminders) = into_sequence(value) else {
        return Value::Array(Vec::new());
    };

    for reminder in reminders.iter_mut().filter_map(Value::as_object_mut) {
        let has_id = reminder
            .get(fields::ID)
            .and_then(Value::as_str)
            .is_some_and(|id| !id.is_empty());
        if !has_id {
            reminder.insert(
                fields::ID.to_string(),
                Value::String(uuid::Uuid::new_v4().to_string()),
            );
        }
    }

    Value::Array(reminders)
}
