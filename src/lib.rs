//! Local library catalog server
//!
//! A REST JSON API over a library catalog: paginated author lists, the
//! copies a reader currently has on loan, and librarian renewals of due
//! dates.

use std::sync::Arc;

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod renewal;
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
