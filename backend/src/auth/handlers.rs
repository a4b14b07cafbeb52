//! Handler functions for authentication-related API endpoints.
//!
//! These functions parse request data and hand it to `AuthService` and
//! `UserService` for the actual work.

use std::sync::Arc;

use crate::api::common::service_error_to_http;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::database::models::UserResponse;
use crate::services::user_service::UserService;
use crate::utils::jwt::IdentityClaim;
use axum::{
    Form,
    extract::{Extension, Json},
    http::StatusCode,
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;

/// Handle user signup request
#[axum::debug_handler]
pub async fn signup(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth_service): Extension<Arc<AuthService>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, ResponseJson<UserResponse>), (StatusCode, String)> {
    let user_service = UserService::new(&pool, &auth_service);

    match user_service.create_user(payload).await {
        Ok(user) => Ok((StatusCode::CREATED, ResponseJson(user.into()))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(auth_service): Extension<Arc<AuthService>>,
    Form(payload): Form<LoginRequest>,
) -> Result<ResponseJson<LoginResponse>, (StatusCode, String)> {
    match auth_service.login(payload).await {
        Ok(response) => Ok(ResponseJson(response)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Get current user information from token
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth_service): Extension<Arc<AuthService>>,
    Extension(claims): Extension<IdentityClaim>,
) -> Result<ResponseJson<UserResponse>, (StatusCode, String)> {
    let user_service = UserService::new(&pool, &auth_service);

    match user_service.get_user_required(claims.user_id()).await {
        Ok(user) => Ok(ResponseJson(user.into())),
        Err(error) => Err(service_error_to_http(error)),
    }
}
