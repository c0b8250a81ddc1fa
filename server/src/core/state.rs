use std::sync::Arc;

use socketioxide::SocketIo;
use socketioxide::layer::SocketIoLayer;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{AdminCredentials, JwtService};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::OrderRepository;
use crate::orders::OrderService;
use crate::realtime::{self, Notifier};
use crate::utils::AppError;

/// Shared application state, cheap to clone
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub orders: OrderService,
    pub credentials: AdminCredentials,
    jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Open the database, wire the socket layer and build every service
    ///
    /// Returns the state plus the Socket.IO tower layer the router must
    /// mount.
    pub async fn initialize(config: &Config) -> Result<(Self, SocketIoLayer), AppError> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!(
                "Failed to create work directory {}: {e}",
                config.work_dir
            ))
        })?;

        let db_service = DbService::new(&config.db_path()).await?;

        let (io_layer, io) = SocketIo::new_layer();
        realtime::register_namespace(&io).await;

        let repo = OrderRepository::new(db_service.db.clone());
        let orders = OrderService::new(repo, Notifier::new(io));

        let state = Self {
            config: config.clone(),
            db: db_service.db,
            orders,
            credentials: AdminCredentials::from_env(),
            jwt_service: Arc::new(JwtService::with_config(config.jwt.clone())),
        };
        Ok((state, io_layer))
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
