// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Day-keyed schedule normalization.
//!
//! Stored plans may be partial, may miss days, and may be kept either as a
//! plain record (`{"Monday": [...]}`) or as an exported associative map
//! (`[["Monday", [...]], ...]`). Everything here is total: malformed input
//! degrades to defaults and never produces an error.

use crate::models::schedule::{WeekSchedule, Weekday};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Storage form of a day-keyed collection: only the days actually written.
pub type StorageDays = BTreeMap<String, Vec<Value>>;

/// The two container shapes a stored day-keyed collection can take.
///
/// This is the only place that knows about the representation ambiguity.
#[derive(Clone, Copy)]
enum StoredDays<'a> {
    /// Plain record keyed by weekday label.
    Record(&'a Map<String, Value>),
    /// Associative map exported as `[key, value]` pairs.
    Entries(&'a [Value]),
    /// Absent or unusable; every lookup misses.
    Empty,
}

impl<'a> StoredDays<'a> {
    fn classify(raw: Option<&'a Value>) -> Self {
        match raw {
            Some(Value::Object(record)) => StoredDays::Record(record),
            Some(Value::Array(entries)) if entries.iter().all(|e| as_entry(e).is_some()) => {
                StoredDays::Entries(entries)
            }
            _ => StoredDays::Empty,
        }
    }

    fn get(self, key: &str) -> Option<&'a Value> {
        match self {
            StoredDays::Record(record) => record.get(key),
            StoredDays::Entries(entries) => entries
                .iter()
                .filter_map(as_entry)
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v),
            StoredDays::Empty => None,
        }
    }

    fn into_record(self) -> Map<String, Value> {
        match self {
            StoredDays::Record(record) => record.clone(),
            StoredDays::Entries(entries) => {
                let mut record = Map::new();
                for (key, value) in entries.iter().filter_map(as_entry) {
                    record
                        .entry(key.to_string())
                        .or_insert_with(|| value.clone());
                }
                record
            }
            StoredDays::Empty => Map::new(),
        }
    }
}

fn as_entry(value: &Value) -> Option<(&str, &Value)> {
    match value.as_array().map(Vec::as_slice) {
        Some([Value::String(key), value]) => Some((key.as_str(), value)),
        _ => None,
    }
}

/// Map-to-record adapter: unify either stored container into a plain record.
///
/// Anything that is neither container becomes an empty record.
pub fn to_record(raw: Option<&Value>) -> Map<String, Value> {
    StoredDays::classify(raw).into_record()
}

/// Produce a collection holding all seven days.
///
/// Days whose stored value is a sequence are kept as-is; every other day gets
/// its own copy of `default_day`.
pub fn fill_days(raw: Option<&Value>, default_day: &[Value]) -> WeekSchedule {
    let stored = StoredDays::classify(raw);

    let days = Weekday::ALL
        .iter()
        .map(|&day| {
            let entries = match stored.get(day.label()) {
                Some(Value::Array(entries)) => entries.clone(),
                _ => default_day.to_vec(),
            };
            (day, entries)
        })
        .collect();

    WeekSchedule::from_days(days)
}

/// Convert a client-submitted record into its storage shape.
///
/// Every submitted key is kept; non-sequence values become empty sequences.
/// Missing days are not filled in.
pub fn to_storage_shape(record: &Map<String, Value>) -> StorageDays {
    record
        .iter()
        .map(|(key, value)| {
            let entries = match value {
                Value::Array(entries) => entries.clone(),
                _ => Vec::new(),
            };
            (key.clone(), entries)
        })
        .collect()
}

/// Repair a submitted weekly-plan record in place: each of the seven days
/// must hold a sequence. Other keys are left alone.
///
/// A non-record value is replaced by a record of empty days.
pub fn validate_weekly_plans(value: &mut Value) {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    if let Value::Object(record) = value {
        for day in Weekday::ALL {
            let entry = record
                .entry(day.label())
                .or_insert_with(|| Value::Array(Vec::new()));
            if !entry.is_array() {
                *entry = Value::Array(Vec::new());
            }
        }
    }
}
