//! Utility module - shared helpers and types
//!
//! # Contents
//!
//! - [`AppError`] / [`AppResponse`] - application error type and API envelope
//! - [`logger`] - tracing setup
//! - [`time`] - local-day window helpers

pub mod error;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResponse, AppResult, ok, ok_with_message};
