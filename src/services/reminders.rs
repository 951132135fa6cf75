// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily reminder sweep.
//!
//! Once a day, for every user:
//! 1. Reminders dated before today are dropped, with an "expired" notice
//! 2. Reminders dated today get one "due" notice per day
//! 3. The reminder list is written back only if something expired
//!
//! Which reminders were already notified is tracked in memory only.

use crate::db::{DocumentUpdate, ProfileStore};
use crate::error::AppError;
use crate::models::user::{fields, Reminder, ReminderHolder};
use crate::services::notifier::Notifier;
use crate::time_utils::parse_reminder_date;
use chrono::NaiveDate;
use dashmap::DashMap;
use futures_util::{stream, StreamExt};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const MAX_CONCURRENT_USERS: usize = 16;

/// Reminders already notified, keyed by user id then date.
#[derive(Clone, Default)]
pub struct SentTodayStore {
    sent: Arc<DashMap<String, HashMap<NaiveDate, HashSet<String>>>>,
}

impl SentTodayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_sent(&self, user_id: &str, date: NaiveDate, reminder_key: &str) -> bool {
        self.sent
            .get(user_id)
            .and_then(|dates| dates.get(&date).map(|keys| keys.contains(reminder_key)))
            .unwrap_or(false)
    }

    pub fn mark_sent(&self, user_id: &str, date: NaiveDate, reminder_key: &str) {
        self.sent
            .entry(user_id.to_string())
            .or_default()
            .entry(date)
            .or_default()
            .insert(reminder_key.to_string());
    }

    /// Forget dates older than `retention_days` before `today`.
    ///
    /// A window reaching past the start of the calendar keeps everything.
    pub fn prune(&self, today: NaiveDate, retention_days: u32) {
        let Some(cutoff) =
            today.checked_sub_signed(chrono::Duration::days(i64::from(retention_days)))
        else {
            return;
        };
        self.sent.retain(|_, dates| {
            dates.retain(|date, _| *date >= cutoff);
            !dates.is_empty()
        });
    }

    /// Number of users with tracked dates.
    pub fn tracked_users(&self) -> usize {
        self.sent.len()
    }
}

/// Totals from one sweep run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub users: usize,
    pub expired: usize,
    pub due_notified: usize,
    pub failed_notifications: usize,
    pub failed_users: usize,
}

#[derive(Debug, Default)]
struct UserOutcome {
    expired: usize,
    due_notified: usize,
    failed_notifications: usize,
}

/// Runs the daily reminder sweep over every stored user.
#[derive(Clone)]
pub struct ReminderSweep {
    store: Arc<dyn ProfileStore>,
    notifier: Arc<dyn Notifier>,
    sent_today: SentTodayStore,
    retention_days: u32,
}

impl ReminderSweep {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        notifier: Arc<dyn Notifier>,
        sent_today: SentTodayStore,
        retention_days: u32,
    ) -> Self {
        Self {
            store,
            notifier,
            sent_today,
            retention_days,
        }
    }

    /// Sweep all users as of `today`.
    ///
    /// Only failing to list users is an error; per-user failures are logged
    /// and counted.
    pub async fn run(&self, today: NaiveDate) -> Result<SweepSummary, AppError> {
        self.sent_today.prune(today, self.retention_days);

        let documents = self.store.find_all().await?;
        let mut summary = SweepSummary {
            users: documents.len(),
            ..Default::default()
        };

        let outcomes: Vec<Result<UserOutcome, AppError>> = stream::iter(documents)
            .map(|document| self.sweep_user(document, today))
            .buffer_unordered(MAX_CONCURRENT_USERS)
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                Ok(outcome) => {
                    summary.expired += outcome.expired;
                    summary.due_notified += outcome.due_notified;
                    summary.failed_notifications += outcome.failed_notifications;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Reminder sweep failed for user");
                    summary.failed_users += 1;
                }
            }
        }

        tracing::info!(
            %today,
            users = summary.users,
            expired = summary.expired,
            due_notified = summary.due_notified,
            failed_notifications = summary.failed_notifications,
            failed_users = summary.failed_users,
            "Reminder sweep complete"
        );

        Ok(summary)
    }

    async fn sweep_user(&self, document: Value, today: NaiveDate) -> Result<UserOutcome, AppError> {
        let holder: ReminderHolder = serde_json::from_value(document)
            .map_err(|e| AppError::Database(format!("Unreadable user document: {}", e)))?;
        let address = holder.email.as_deref().unwrap_or_default();

        let mut outcome = UserOutcome::default();
        let mut kept = Vec::with_capacity(holder.reminders.len());

        for raw in holder.reminders {
            // Entries that are not reminder objects are kept untouched.
            let Ok(reminder) = serde_json::from_value::<Reminder>(raw.clone()) else {
                kept.push(raw);
                continue;
            };
            let Some(date) = parse_reminder_date(&reminder.date) else {
                kept.push(raw);
                continue;
            };

            if date < today {
                outcome.expired += 1;
                let message = format!(
                    "Your reminder \"{}\" (for {}) has expired.",
                    reminder.title, reminder.date
                );
                if !self.notify(&holder.id, address, &message).await {
                    outcome.failed_notifications += 1;
                }
                continue;
            }

            if date == today {
                let key = reminder_key(&reminder);
                if !self.sent_today.was_sent(&holder.id, date, &key) {
                    let message = format!(
                        "Reminder: {}\n{}\nTime: {}",
                        reminder.title, reminder.description, reminder.time
                    );
                    if self.notify(&holder.id, address, &message).await {
                        self.sent_today.mark_sent(&holder.id, date, &key);
                        tracing::debug!(user_id = %holder.id, reminder_id = %key, "Due reminder sent");
                        outcome.due_notified += 1;
                    } else {
                        outcome.failed_notifications += 1;
                    }
                }
            }

            kept.push(raw);
        }

        if outcome.expired > 0 {
            let mut update = DocumentUpdate::new();
            update.set(fields::REMINDERS, Value::Array(kept));
            if self
                .store
                .find_by_id_and_update(&holder.id, &update)
                .await?
                .is_none()
            {
                tracing::warn!(user_id = %holder.id, "User vanished during reminder sweep");
            } else {
                tracing::debug!(
                    user_id = %holder.id,
                    expired = outcome.expired,
                    "Dropped expired reminders"
                );
            }
        }

        Ok(outcome)
    }

    /// Best-effort send; failures are logged and reported as `false`.
    async fn notify(&self, user_id: &str, address: &str, message: &str) -> bool {
        if address.is_empty() {
            tracing::warn!(user_id, "No address on file, skipping notification");
            return false;
        }

        match self.notifier.send(address, message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Reminder notification failed");
                false
            }
        }
    }
}

/// Identity used for "already sent" tracking.
///
/// Reminders stored before ids were assigned fall back to their content.
fn reminder_key(reminder: &Reminder) -> String {
    if reminder.id.is_empty() {
        format!("{}|{}|{}", reminder.date, reminder.time, reminder.title)
    } else {
        reminder.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sent_today_tracking() {
        let store = SentTodayStore::new();
        let today = date(2026, 3, 1);

        assert!(!store.was_sent("u1", today, "r1"));
        store.mark_sent("u1", today, "r1");
        assert!(store.was_sent("u1", today, "r1"));
        assert!(!store.was_sent("u1", today, "r2"));
        assert!(!store.was_sent("u2", today, "r1"));
        assert!(!store.was_sent("u1", date(2026, 3, 2), "r1"));
    }

    #[test]
    fn test_sent_today_prune() {
        let store = SentTodayStore::new();
        store.mark_sent("u1", date(2026, 2, 20), "old");
        store.mark_sent("u2", date(2026, 2, 28), "recent");

        store.prune(date(2026, 3, 1), 2);

        assert_eq!(store.tracked_users(), 1);
        assert!(store.was_sent("u2", date(2026, 2, 28), "recent"));
        assert!(!store.was_sent("u1", date(2026, 2, 20), "old"));
    }

    #[test]
    fn test_sent_today_prune_with_huge_retention_keeps_everything() {
        let store = SentTodayStore::new();
        store.mark_sent("u1", date(2026, 2, 20), "old");

        store.prune(date(2026, 3, 1), u32::MAX);

        assert!(store.was_sent("u1", date(2026, 2, 20), "old"));
    }

    #[test]
    fn test_reminder_key_fallback() {
        let with_id = Reminder {
            id: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(reminder_key(&with_id), "abc");

        let without_id = Reminder {
            title: "Stretch".to_string(),
            time: "07:00".to_string(),
            date: "2026-03-01".to_string(),
            ..Default::default()
        };
        assert_eq!(reminder_key(&without_id), "2026-03-01|07:00|Stretch");
    }
}
