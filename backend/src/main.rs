//! Main entry point for the marketplace backend.
//!
//! This file initializes logging, loads configuration, opens the database,
//! builds the authentication service and serves the Axum router.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use auth::service::AuthService;
use auth::store::SqliteCredentialStore;
use config::Config;
use database::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utils::clock::SystemClock;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    let pool = db.pool().clone();

    let auth_service = Arc::new(AuthService::new(
        &config.auth(),
        Arc::new(SqliteCredentialStore::new(pool.clone())),
        Arc::new(SystemClock),
    ));

    let app = api::router::build_router(pool, auth_service, &config);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;

    info!("Starting marketplace server on port {}", config.server_port);
    axum::serve(listener, app).await.context("server error")?;

    db.close().await;
    Ok(())
}
