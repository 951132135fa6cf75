// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Outbound notifications.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Subject line used for every reminder message.
pub const NOTIFICATION_SUBJECT: &str = "Lifesync+ Reminder";

/// Delivers a text message to a user's address.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, address: &str, message: &str) -> Result<(), NotifyError>;
}

/// Errors from notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Endpoint returned {0}")]
    Status(u16),
}

/// Body posted to the notification endpoint.
#[derive(Serialize)]
struct WebhookMessage<'a> {
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Sends notifications by POSTing JSON to a mail/notification gateway.
#[derive(Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    endpoint: String,
}

impl WebhookNotifier {
    pub fn new(endpoint: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { http, endpoint }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, address: &str, message: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&WebhookMessage {
                to: address,
                subject: NOTIFICATION_SUBJECT,
                text: message,
            })
            .send()
            .await
            .map_err(|e| NotifyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }

        tracing::debug!(to = address, "Notification sent");
        Ok(())
    }
}

/// Logs notifications instead of delivering them (local development).
#[derive(Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, address: &str, message: &str) -> Result<(), NotifyError> {
        tracing::info!(to = address, message, "Notification (log only)");
        Ok(())
    }
}
