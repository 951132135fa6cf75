// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived body metrics (BMI, BMR, daily calorie needs).

use crate::models::user::{fields, DEFAULT_ACTIVITY_FACTOR};
use serde_json::{Map, Value};

/// Physical attributes whose change triggers a metrics recomputation.
pub const METRIC_INPUTS: [&str; 5] = [
    fields::WEIGHT,
    fields::HEIGHT,
    fields::AGE,
    fields::GENDER,
    fields::ACTIVITY,
];

/// Computed metrics, stored as display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyMetrics {
    /// kg/m², two decimals
    pub bmi: String,
    /// kcal/day, rounded
    pub bmr: String,
    /// kcal/day, rounded
    pub daily_calories: String,
}

/// Compute metrics from a profile's attributes.
///
/// Weight in kg, height in cm, age in years. Numeric strings are accepted.
/// Returns `None` unless weight, height and age are all present and positive.
pub fn compute(attributes: &Map<String, Value>) -> Option<BodyMetrics> {
    let weight = number(attributes.get(fields::WEIGHT))?;
    let height = number(attributes.get(fields::HEIGHT))?;
    let age = number(attributes.get(fields::AGE))?;
    if weight <= 0.0 || height <= 0.0 || age <= 0.0 {
        return None;
    }

    let activity = number(attributes.get(fields::ACTIVITY))
        .filter(|a| *a > 0.0)
        .unwrap_or(DEFAULT_ACTIVITY_FACTOR);
    let male = attributes
        .get(fields::GENDER)
        .and_then(Value::as_str)
        .is_some_and(|g| g.eq_ignore_ascii_case("male"));

    let height_m = height / 100.0;
    let bmi = weight / (height_m * height_m);

    // Mifflin-St Jeor
    let gender_constant = if male { 5.0 } else { -161.0 };
    let bmr = (10.0 * weight + 6.25 * height - 5.0 * age + gender_constant).round();
    let daily_calories = (bmr * activity).round();

    Some(BodyMetrics {
        bmi: format!("{:.2}", bmi),
        bmr: format!("{}", bmr),
        daily_calories: format!("{}", daily_calories),
    })
}

fn number(value: Option<&Value>) -> Option<f64> {
    let n: f64 = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
