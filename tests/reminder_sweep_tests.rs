// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily reminder sweep tests over the in-memory store.

use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use wellness_tracker::db::{MemoryStore, ProfileStore};
use wellness_tracker::services::{ReminderSweep, SentTodayStore};

mod common;
use common::{seed_user, FailingNotifier, RecordingNotifier};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn sweep_with(
    store: &MemoryStore,
    notifier: Arc<dyn wellness_tracker::services::Notifier>,
    sent_today: SentTodayStore,
) -> ReminderSweep {
    ReminderSweep::new(Arc::new(store.clone()), notifier, sent_today, 2)
}

#[tokio::test]
async fn test_expired_reminders_are_dropped_and_notified() {
    let store = MemoryStore::new();
    seed_user(
        &store,
        "u1",
        json!({ "reminders": [
            { "id": "r1", "title": "Dentist", "date": "2026-03-09", "time": "09:00", "description": "" },
            { "id": "r2", "title": "Gym", "date": "2026-03-12", "time": "18:00", "description": "" },
        ] }),
    )
    .await;
    let notifier = Arc::new(RecordingNotifier::default());

    let summary = sweep_with(&store, notifier.clone(), SentTodayStore::new())
        .run(today())
        .await
        .unwrap();

    assert_eq!(summary.users, 1);
    assert_eq!(summary.expired, 1);
    assert_eq!(summary.due_notified, 0);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "test@example.com");
    assert_eq!(
        sent[0].1,
        "Your reminder \"Dentist\" (for 2026-03-09) has expired."
    );

    let stored = store.find_by_id("u1").await.unwrap().unwrap();
    let reminders = stored["reminders"].as_array().unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0]["id"], "r2");
}

#[tokio::test]
async fn test_due_reminder_notified_once_per_day() {
    let store = MemoryStore::new();
    seed_user(
        &store,
        "u1",
        json!({ "reminders": [
            { "id": "r1", "title": "Stretch", "date": "2026-03-10", "time": "07:00", "description": "Ten minutes" },
        ] }),
    )
    .await;
    let notifier = Arc::new(RecordingNotifier::default());
    let sweep = sweep_with(&store, notifier.clone(), SentTodayStore::new());

    let first = sweep.run(today()).await.unwrap();
    let second = sweep.run(today()).await.unwrap();

    assert_eq!(first.due_notified, 1);
    assert_eq!(second.due_notified, 0);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, "Reminder: Stretch\nTen minutes\nTime: 07:00");

    // Nothing expired, so nothing was written back
    let stored = store.find_by_id("u1").await.unwrap().unwrap();
    assert_eq!(stored["reminders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_due_notification_is_retried() {
    let store = MemoryStore::new();
    seed_user(
        &store,
        "u1",
        json!({ "reminders": [
            { "id": "r1", "title": "Stretch", "date": "2026-03-10", "time": "07:00", "description": "" },
        ] }),
    )
    .await;
    let sent_today = SentTodayStore::new();

    let failed = sweep_with(&store, Arc::new(FailingNotifier), sent_today.clone())
        .run(today())
        .await
        .unwrap();
    assert_eq!(failed.failed_notifications, 1);
    assert_eq!(failed.due_notified, 0);

    let notifier = Arc::new(RecordingNotifier::default());
    let retried = sweep_with(&store, notifier.clone(), sent_today)
        .run(today())
        .await
        .unwrap();
    assert_eq!(retried.due_notified, 1);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_expired_reminders_dropped_even_when_notify_fails() {
    let store = MemoryStore::new();
    seed_user(
        &store,
        "u1",
        json!({ "reminders": [
            { "id": "r1", "title": "Old", "date": "2026-01-01", "time": "", "description": "" },
        ] }),
    )
    .await;

    let summary = sweep_with(&store, Arc::new(FailingNotifier), SentTodayStore::new())
        .run(today())
        .await
        .unwrap();
    assert_eq!(summary.expired, 1);
    assert_eq!(summary.failed_notifications, 1);

    let stored = store.find_by_id("u1").await.unwrap().unwrap();
    assert_eq!(stored["reminders"], json!([]));
}

#[tokio::test]
async fn test_unparseable_entries_are_kept_untouched() {
    let store = MemoryStore::new();
    seed_user(
        &store,
        "u1",
        json!({ "reminders": [
            { "id": "r1", "title": "Someday", "date": "next week" },
            "junk",
            { "id": "r2", "title": "Old", "date": "2026-03-01" },
        ] }),
    )
    .await;
    let notifier = Arc::new(RecordingNotifier::default());

    sweep_with(&store, notifier.clone(), SentTodayStore::new())
        .run(today())
        .await
        .unwrap();

    let stored = store.find_by_id("u1").await.unwrap().unwrap();
    assert_eq!(
        stored["reminders"],
        json!([{ "id": "r1", "title": "Someday", "date": "next week" }, "junk"])
    );
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_one_bad_user_does_not_stop_the_sweep() {
    let store = MemoryStore::new();
    // No id: cannot be swept
    store
        .insert("broken", &json!({ "reminders": [] }))
        .await
        .unwrap();
    seed_user(
        &store,
        "u1",
        json!({ "reminders": [{ "id": "r1", "title": "Stretch", "date": "2026-03-10" }] }),
    )
    .await;
    let notifier = Arc::new(RecordingNotifier::default());

    let summary = sweep_with(&store, notifier.clone(), SentTodayStore::new())
        .run(today())
        .await
        .unwrap();

    assert_eq!(summary.users, 2);
    assert_eq!(summary.failed_users, 1);
    assert_eq!(summary.due_notified, 1);
}

#[tokio::test]
async fn test_users_without_reminders_are_skipped() {
    let store = MemoryStore::new();
    seed_user(&store, "u1", json!({})).await;
    let notifier = Arc::new(RecordingNotifier::default());

    let summary = sweep_with(&store, notifier.clone(), SentTodayStore::new())
        .run(today())
        .await
        .unwrap();

    assert_eq!(summary.users, 1);
    assert_eq!(summary.failed_users, 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_reminders_with_null_fields_are_still_swept() {
    let store = MemoryStore::new();
    seed_user(
        &store,
        "u1",
        json!({ "reminders": [
            { "id": "r1", "title": "Dentist", "date": "2026-03-01", "description": null },
            { "id": 7, "title": "Stretch", "date": "2026-03-10", "time": null, "description": null },
        ] }),
    )
    .await;
    let notifier = Arc::new(RecordingNotifier::default());

    let summary = sweep_with(&store, notifier.clone(), SentTodayStore::new())
        .run(today())
        .await
        .unwrap();

    assert_eq!(summary.expired, 1);
    assert_eq!(summary.due_notified, 1);

    let sent = notifier.sent();
    assert!(sent
        .iter()
        .any(|(_, text)| text == "Your reminder \"Dentist\" (for 2026-03-01) has expired."));
    assert!(sent
        .iter()
        .any(|(_, text)| text == "Reminder: Stretch\n\nTime: "));

    let stored = store.find_by_id("u1").await.unwrap().unwrap();
    let reminders = stored["reminders"].as_array().unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0]["id"], 7);
}
