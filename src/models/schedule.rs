// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekday labels and the day-keyed schedule types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Day of the week used to key every per-day collection.
///
/// Variant order is display order (Sunday first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All seven days in display order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Label used as the document key for this day.
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Parse a document key. Matching is exact (labels are case-sensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.label() == label)
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A fully-populated day-keyed collection.
///
/// Only built by the normalizer, so it always carries all seven days.
/// Entries are kept as raw JSON: the only shape guarantee is that each
/// day holds a sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeekSchedule(BTreeMap<Weekday, Vec<Value>>);

impl WeekSchedule {
    pub(crate) fn from_days(days: BTreeMap<Weekday, Vec<Value>>) -> Self {
        debug_assert_eq!(days.len(), Weekday::ALL.len());
        Self(days)
    }

    /// Entries for one day.
    pub fn day(&self, day: Weekday) -> &[Value] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable entries for one day.
    pub fn day_mut(&mut self, day: Weekday) -> &mut Vec<Value> {
        self.0.entry(day).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[Value])> {
        self.0.iter().map(|(day, entries)| (*day, entries.as_slice()))
    }

    /// Convert to the plain-record JSON form sent to clients.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(day, entries)| (day.label().to_string(), Value::Array(entries.clone())))
                .collect(),
        )
    }
}

/// Wire shape of a weekly-plan entry.
///
/// Entries are stored and normalized as raw JSON; this type documents the
/// shape and is exported with the TypeScript bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoutineEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    /// "HH:MM"
    pub time: String,
    #[serde(default)]
    pub description: String,
}

/// Wire shape of a fitness-plan entry (see [`RoutineEvent`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Workout {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Fixed meal slots of a day, in plan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSlotKind {
    Breakfast,
    MorningSnacks,
    Lunch,
    AfternoonSnacks,
    Dinner,
}

impl MealSlotKind {
    pub const ALL: [MealSlotKind; 5] = [
        MealSlotKind::Breakfast,
        MealSlotKind::MorningSnacks,
        MealSlotKind::Lunch,
        MealSlotKind::AfternoonSnacks,
        MealSlotKind::Dinner,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MealSlotKind::Breakfast => "Breakfast",
            MealSlotKind::MorningSnacks => "Morning Snacks",
            MealSlotKind::Lunch => "Lunch",
            MealSlotKind::AfternoonSnacks => "Afternoon Snacks",
            MealSlotKind::Dinner => "Dinner",
        }
    }
}

/// One meal slot. Calories are free text, as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MealSlot {
    pub description: String,
    pub calories: String,
}

impl MealSlot {
    /// The default day of meals: one empty slot per [`MealSlotKind`].
    pub fn empty_day() -> Vec<Value> {
        MealSlotKind::ALL
            .iter()
            .map(|_| MealSlot::default().to_value())
            .collect()
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "description": self.description,
            "calories": self.calories,
        })
    }
}
