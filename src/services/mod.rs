// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod metrics;
pub mod normalizer;
pub mod notifier;
pub mod profile;
pub mod reminders;

pub use notifier::{LogNotifier, Notifier, NotifyError, WebhookNotifier};
pub use profile::{NormalizedProfile, ProfileService};
pub use reminders::{ReminderSweep, SentTodayStore, SweepSummary};
