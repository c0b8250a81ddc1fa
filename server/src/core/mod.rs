//! Core Module - configuration, state and the server itself
//!
//! - [`Config`] - env-driven configuration
//! - [`ServerState`] - shared application state
//! - [`Server`] - HTTP + Socket.IO server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
