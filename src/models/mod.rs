// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod schedule;
pub mod user;

pub use schedule::{MealSlot, RoutineEvent, WeekSchedule, Weekday, Workout};
pub use user::{NewProfile, Reminder, Todo};
