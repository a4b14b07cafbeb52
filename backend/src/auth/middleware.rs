//! Middleware for protecting authenticated routes.
//!
//! Validates the bearer token on every protected request and stores the
//! decoded `IdentityClaim` in the request extensions for handlers.

use std::sync::Arc;

use crate::api::common::{error_response, service_error_to_http};
use crate::auth::errors::UNAUTHENTICATED_MESSAGE;
use crate::auth::service::AuthService;
use axum::{
    extract::Request,
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// JWT authentication middleware
pub async fn jwt_auth(mut request: Request, next: Next) -> Result<Response, (StatusCode, String)> {
    let auth_service = request
        .extensions()
        .get::<Arc<AuthService>>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("AuthService extension missing from router");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "internal_error",
            )
        })?;

    let token = bearer_token(&request).ok_or_else(|| {
        tracing::debug!("Request to {} without bearer token", request.uri().path());
        error_response(
            StatusCode::UNAUTHORIZED,
            UNAUTHENTICATED_MESSAGE,
            "unauthenticated",
        )
    })?;

    let claims = auth_service
        .authenticate_token(token)
        .map_err(service_error_to_http)?;

    tracing::debug!("Authenticated request from '{}'", claims.username());

    // Add claims to request extensions for use in handlers
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(request: &Request) -> Option<&str> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
