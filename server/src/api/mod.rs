//! API Routing Module
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - staff login
//! - [`orders`] - customer and staff order operations
//! - [`reports`] - daily summary

pub mod auth;
pub mod health;
pub mod orders;
pub mod reports;

use axum::Router;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble every resource router
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(orders::router())
        .merge(reports::router())
}
