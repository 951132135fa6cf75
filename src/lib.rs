// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wellness tracker backend.
//!
//! Serves user profiles (weekly routine, fitness and meal plans, reminders)
//! and runs a daily reminder sweep.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{Notifier, ProfileService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub profiles: ProfileService,
    pub notifier: Arc<dyn Notifier>,
}
