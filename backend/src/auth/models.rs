//! Data structures for authentication requests and responses.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request payload
#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, message = "Username must be at least 2 characters"))]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request, sent form-encoded. Extra OAuth2 password-flow fields such
/// as `grant_type` and `scope` are accepted and ignored.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login response containing the access token
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub token_type: String,
}

impl LoginResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            message: "Successful Authentication!".to_string(),
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
