//! Order API Module
//!
//! Customer routes (place, read, add-batch) are open; every status-changing
//! staff route and the admin list views require a valid staff token.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Customer-facing
        .route("/", post(handler::place_order).get(handler::live_orders))
        .route("/active", get(handler::active_order))
        .route("/table/{table_id}", get(handler::orders_for_table))
        .route("/{id}", get(handler::get_order))
        .route("/{id}/add-batch", patch(handler::add_batch))
        // Staff-only
        .route(
            "/{id}/status",
            patch(handler::set_status).put(handler::set_status),
        )
        .route("/{id}/advance-status", post(handler::advance_status))
        .route("/{id}/serve", patch(handler::serve_order))
        .route("/complete/{id}", post(handler::complete_order))
        .route("/completed", get(handler::completed_orders))
        .route("/completed/by-date", get(handler::completed_orders_by_date))
}
