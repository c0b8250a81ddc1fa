//! HTTP Server
//!
//! Plain-TCP axum server carrying the REST API and the Socket.IO layer on
//! one port.

use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, ServerState};
use crate::utils::{AppError, AppResult};

pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> AppResult<()> {
        let (state, io_layer) = ServerState::initialize(&self.config).await?;
        let app = build_app(state, io_layer, &self.config)?;

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!("Comanda server listening on {addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))
    }
}

fn build_app(
    state: ServerState,
    io_layer: socketioxide::layer::SocketIoLayer,
    config: &Config,
) -> AppResult<Router> {
    let cors = match &config.cors_origin {
        Some(origin) => {
            let origin = origin
                .parse::<http::HeaderValue>()
                .map_err(|_| AppError::internal(format!("Invalid CORS_ORIGIN: {origin}")))?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    };

    Ok(api::build_router()
        .with_state(state)
        .layer(io_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
}
