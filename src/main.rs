// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wellness tracker API server.
//!
//! Serves user profiles and runs the daily reminder sweep on a cron schedule.

use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wellness_tracker::{
    config::{Config, StorageBackend},
    db::{FirestoreDb, MemoryStore, ProfileStore},
    services::{LogNotifier, Notifier, ProfileService, ReminderSweep, SentTodayStore, WebhookNotifier},
    time_utils::today_utc,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting wellness tracker API");

    let store: Arc<dyn ProfileStore> = match config.storage_backend {
        StorageBackend::Firestore => Arc::new(
            FirestoreDb::new(&config.gcp_project_id)
                .await
                .expect("Failed to connect to Firestore"),
        ),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
        Some(url) => {
            tracing::info!(endpoint = %url, "Webhook notifier configured");
            Arc::new(WebhookNotifier::new(url.clone()))
        }
        None => {
            tracing::info!("No NOTIFY_WEBHOOK_URL set, notifications are logged only");
            Arc::new(LogNotifier)
        }
    };

    // Daily reminder sweep
    let sweep = ReminderSweep::new(
        store.clone(),
        notifier.clone(),
        SentTodayStore::new(),
        config.sent_today_retention_days,
    );
    let scheduler = JobScheduler::new().await?;
    scheduler
        .add(Job::new_async(
            config.reminder_sweep_schedule.as_str(),
            move |_uuid, _l| {
                let sweep = sweep.clone();
                Box::pin(async move {
                    if let Err(e) = sweep.run(today_utc()).await {
                        tracing::error!(error = %e, "Reminder sweep failed");
                    }
                })
            },
        )?)
        .await?;
    scheduler.start().await?;
    tracing::info!(
        schedule = %config.reminder_sweep_schedule,
        "Reminder sweep scheduled"
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        profiles: ProfileService::new(store),
        notifier,
    });

    let app = wellness_tracker::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wellness_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
