//! EMS - Event Management System
//!
//! REST JSON API for proposing, reviewing and running events, with
//! registrations, check-in, communications, post-event reports and the
//! supporting content (departments, offices, news, sliders, files).

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
