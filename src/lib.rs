//! Lectern Library Management System
//!
//! A Rust implementation of the Lectern library management server,
//! providing a REST JSON API over a JSON-file record store for managing
//! books, members, loans and reservations.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod ratelimit;
pub mod services;
pub mod store;
pub mod validate;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub rate_limiter: Arc<ratelimit::RateLimiter>,
}
