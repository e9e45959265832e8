//! Axum HTTP API server for census participant records.
//!
//! This crate provides:
//! - CRUD and projection routes over an in-memory participant store
//! - An admin gate in front of every participant route
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use auth::{issue_admin_token, AdminGate, AdminSession};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{ParticipantService, ParticipantStore};
pub use state::AppState;
