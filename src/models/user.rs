// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User document layout for storage and API.

use crate::models::schedule::Weekday;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Top-level field names of a stored user document.
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    /// Credential; never leaves the service.
    pub const PASSWORD: &str = "password";

    pub const WEIGHT: &str = "weight";
    pub const HEIGHT: &str = "height";
    pub const AGE: &str = "age";
    pub const GENDER: &str = "gender";
    pub const ACTIVITY: &str = "activity";
    pub const FITNESS_GOAL: &str = "fitnessGoal";

    pub const BMI: &str = "bmi";
    pub const BMR: &str = "bmr";
    pub const DAILY_CALORIES: &str = "dailyCalories";

    pub const WEEKLY_PLANS: &str = "weeklyPlans";
    pub const FITNESS_PLANS: &str = "fitnessPlans";
    pub const MEAL_PLANS: &str = "mealPlans";
    pub const REMINDERS: &str = "reminders";
    pub const TODOS: &str = "todos";
    pub const COMPLETED: &str = "completed";

    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// Activity factor for a sedentary user.
pub const DEFAULT_ACTIVITY_FACTOR: f64 = 1.2;
pub const DEFAULT_FITNESS_GOAL: &str = "maintain";

/// A dated one-off reminder.
///
/// Reminders are stored as submitted, so every field reads leniently: a
/// missing or `null` field is empty and a number keeps its digits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Reminder {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    /// "YYYY-MM-DD"
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Wire shape of a to-do entry.
///
/// Todos are stored as submitted; this type documents the shape and is
/// exported with the TypeScript bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Todo {
    pub text: String,
    #[serde(default)]
    pub description: String,
}

/// Data needed to create a profile at signup.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProfile {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

impl NewProfile {
    /// Build the initial stored document: every collection empty and
    /// defaults for the goal and activity factor.
    ///
    /// `credential` is opaque here; it is produced by the auth layer.
    pub fn into_document(self, id: &str, credential: &str, now: &str) -> serde_json::Result<Value> {
        let empty_week: Map<String, Value> = Weekday::ALL
            .iter()
            .map(|day| (day.label().to_string(), Value::Array(Vec::new())))
            .collect();

        serde_json::to_value(UserDocument {
            id,
            name: self.name,
            email: self.email,
            password: credential,
            weekly_plans: empty_week,
            fitness_plans: Map::new(),
            meal_plans: Map::new(),
            reminders: Vec::new(),
            todos: Vec::new(),
            completed: Map::new(),
            fitness_goal: DEFAULT_FITNESS_GOAL,
            activity: DEFAULT_ACTIVITY_FACTOR,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Initial shape of a stored user document.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument<'a> {
    id: &'a str,
    name: String,
    email: String,
    password: &'a str,
    weekly_plans: Map<String, Value>,
    fitness_plans: Map<String, Value>,
    meal_plans: Map<String, Value>,
    reminders: Vec<Value>,
    todos: Vec<Value>,
    completed: Map<String, Value>,
    fitness_goal: &'a str,
    activity: f64,
    created_at: &'a str,
    updated_at: &'a str,
}

/// Fields of a user document the reminder sweep needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderHolder {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub reminders: Vec<Value>,
}
