//! Comanda Server - restaurant table-ordering backend
//!
//! One embedded-database process serving three kinds of clients:
//! customers placing and watching orders from their table, kitchen/admin
//! staff driving each order through the status workflow, and the daily
//! reports. Live updates go out over Socket.IO; polling the REST API is the
//! fallback source of truth.
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/       # config, state, server
//! ├── auth/       # JWT + staff extractor
//! ├── db/         # embedded SurrealDB, models, repositories
//! ├── orders/     # status transition engine + order service
//! ├── realtime/   # Socket.IO fan-out
//! ├── api/        # HTTP routes and handlers
//! └── utils/      # errors, logging, time helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod realtime;
pub mod utils;

pub use auth::{CurrentStaff, JwtService};
pub use core::{Config, Server, ServerState};
pub use db::models::{Batch, Order, OrderLine, OrderStatus};
pub use orders::OrderService;
pub use realtime::Notifier;
pub use utils::{AppError, AppResponse, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Security event logging, always under the `security` target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env`, prepare the work directory and start logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    if config.log_to_file {
        let log_dir = config.log_dir();
        std::fs::create_dir_all(&log_dir)?;
        init_logger_with_file(Some(&config.log_level), Some(&log_dir));
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }

    Ok(())
}
