//! Database models

pub mod order;
pub mod serde_helpers;

pub use order::{Batch, Order, OrderLine, OrderStatus};
