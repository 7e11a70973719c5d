//! MES access-control API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;

use axum::Router;
use mes_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackend, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{
    build_memory_app_state, build_memory_session_layer, build_postgres_app_state,
    build_postgres_session_layer, connect_and_migrate,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let address = config.socket_address()?;

    let app = match &config.storage {
        StorageBackend::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            let session_layer =
                build_postgres_session_layer(pool.clone(), config.cookie_secure).await?;
            build_router(
                build_postgres_app_state(pool, &config),
                &config.frontend_url,
                session_layer,
            )?
        }
        StorageBackend::Memory => build_router(
            build_memory_app_state(&config),
            &config.frontend_url,
            build_memory_session_layer(config.cookie_secure),
        )?,
    };

    serve(app, address, config.storage.label()).await
}

async fn serve(app: Router, address: SocketAddr, storage: &str) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, storage, "mes-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
