//! Orders Module
//!
//! Domain logic for the order lifecycle: the pure status transition engine
//! and the service that orchestrates storage and fan-out around it.

pub mod service;
pub mod status;

pub use service::{AddBatch, AdvanceOutcome, DailySummary, LiveOrders, OrderService, PlaceOrder};
pub use status::TransitionError;
