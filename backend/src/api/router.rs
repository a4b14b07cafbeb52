//! Assembles the application router.
//!
//! Shared state travels as `Extension` layers: the SQLite pool for the
//! repositories and `Arc<AuthService>` for the auth handlers and `jwt_auth`.

use std::sync::Arc;

use crate::api::item::routes::item_router;
use crate::api::timing::process_time;
use crate::auth::routes::auth_router;
use crate::auth::service::AuthService;
use crate::config::Config;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    middleware,
    response::Json,
    routing::get,
};
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;

pub fn build_router(pool: SqlitePool, auth_service: Arc<AuthService>, config: &Config) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth_router())
        .nest("/items", item_router())
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(Extension(auth_service))
        .layer(Extension(pool))
        .layer(middleware::from_fn(process_time))
        .layer(build_cors_layer(&config.cors_allowed_origins))
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "Marketplace Backend",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Welcome to the Marketplace API"
    }))
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("CORS: Invalid origin in config: {}", origin);
                None
            })
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, denying cross-origin requests");
        return CorsLayer::new().allow_origin(AllowOrigin::exact(HeaderValue::from_static("null")));
    }

    tracing::info!("CORS: Allowing {} origin(s)", origins.len());
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
