//! Athenaeum Library Management Backend
//!
//! A Rust implementation of the Athenaeum library backend, providing a REST
//! JSON API for managing books, students and borrow records, with bulk
//! catalog import from CSV/XLSX files.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod import;
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
