//! Matchpoint Court Booking Platform
//!
//! A Rust REST API server for multi-tenant court booking: organizations
//! manage fields, members reserve time slots, payments settle bookings.
//! The scheduling, pricing and lifecycle rules live in [`engine`]; handlers
//! and repositories are thin around it.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
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
