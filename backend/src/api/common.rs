//! Error handling utilities for API responses.
//!
//! Successful requests return the resource itself as JSON. Failures share
//! one envelope, built here from service-layer errors.
//!
//! # Response Format
//! All errors return consistent JSON responses containing:
//! - `message`: Human-readable message
//! - `error.error_type`: Machine-readable error category
//!
//! # Error Handling Flow
//! 1. Service layer returns a `ServiceError`
//! 2. `service_error_to_http` converts it to a status code and JSON body
//! 3. Authentication failures always produce the same generic body

use crate::errors::ServiceError;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Body of every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable message
    pub message: String,
    pub error: ErrorDetails,
    /// Response timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: ErrorDetails {
                error_type: error_type.into(),
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Serializes an error envelope for the given status.
pub fn error_response(
    status: StatusCode,
    message: impl Into<String>,
    error_type: &str,
) -> (StatusCode, String) {
    let body = ErrorResponse::new(message, error_type);
    let body = serde_json::to_string(&body).unwrap_or_else(|_| {
        r#"{"success":false,"message":"Internal server error"}"#.to_string()
    });
    (status, body)
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> (StatusCode, String) {
    match error {
        ServiceError::Validation { message } => {
            error_response(StatusCode::BAD_REQUEST, message, "validation_error")
        }
        ServiceError::NotFound { entity, identifier } => error_response(
            StatusCode::NOT_FOUND,
            format!("{} '{}' not found", entity, identifier),
            "not_found",
        ),
        ServiceError::AlreadyExists { entity, identifier } => error_response(
            StatusCode::CONFLICT,
            format!("{} '{}' already exists", entity, identifier),
            "already_exists",
        ),
        ServiceError::Unauthenticated { message } => {
            error_response(StatusCode::UNAUTHORIZED, message, "unauthenticated")
        }
        ServiceError::Database { source } => {
            tracing::error!("Database error: {:#}", source);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "database_error",
            )
        }
        ServiceError::InternalError { message } => {
            tracing::error!("Internal error: {}", message);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "internal_error",
            )
        }
    }
}
