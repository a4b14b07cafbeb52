//! JWT token utilities for authentication.
//!
//! Provides token creation and validation for the access tokens handed out at
//! login. Tokens are HS256-signed and self-contained; the server keeps no
//! record of what it issued, so a token stays usable until `exp`.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::errors::{AuthError, TokenRejection};
use crate::utils::clock::Clock;

/// Claims written into every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// User ID
    pub id: i64,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issued at timestamp
    pub iat: i64,
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityClaim {
    pub username: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtUtils {
    /// Create a new JwtUtils instance signing with `secret`.
    pub fn new(secret: &str, clock: Arc<dyn Clock>) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // Expiry is checked against the injected clock in `decode_token`;
        // the library would otherwise consult the wall clock with leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            clock,
        }
    }

    /// Generate a signed token for `username` that expires `ttl` from now.
    pub fn issue_token(
        &self,
        username: &str,
        user_id: i64,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = self.clock.now();
        let exp = now.checked_add_signed(ttl).ok_or_else(|| {
            AuthError::TokenIssue(format!("Token lifetime {} is out of range", ttl))
        })?;

        let claims = Claims {
            sub: username.to_string(),
            id: user_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a token.
    pub fn decode_token(&self, token: &str) -> Result<IdentityClaim, TokenRejection> {
        // Decoding into a loose JSON value keeps claim-shape problems apart
        // from signature problems: once the signature verifies, any value
        // deserializes, and missing fields are reported below.
        let payload = decode::<Value>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenRejection::Expired,
                ErrorKind::MissingRequiredClaim(_) => TokenRejection::MalformedClaim,
                _ => TokenRejection::InvalidSignature,
            })?;

        let username = payload
            .get("sub")
            .and_then(Value::as_str)
            .ok_or(TokenRejection::MalformedClaim)?;
        let user_id = payload
            .get("id")
            .and_then(Value::as_i64)
            .ok_or(TokenRejection::MalformedClaim)?;
        let exp = payload
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or(TokenRejection::MalformedClaim)?;

        if self.clock.now().timestamp() > exp {
            return Err(TokenRejection::Expired);
        }

        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or(TokenRejection::MalformedClaim)?;

        Ok(IdentityClaim {
            username: username.to_string(),
            user_id,
            expires_at,
        })
    }
}

impl IdentityClaim {
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
