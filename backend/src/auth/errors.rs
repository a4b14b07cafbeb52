//! Failure reasons inside the authentication core.
//!
//! These distinctions exist for server-side logging only. At the HTTP
//! boundary every variant except `StorageUnavailable` collapses into one
//! generic 401 so callers cannot tell why they were rejected.

use crate::errors::ServiceError;
use thiserror::Error;

/// Generic message returned for any login failure.
pub const LOGIN_FAILED_MESSAGE: &str = "Incorrect username or password";

/// Generic message returned for any bearer token failure.
pub const UNAUTHENTICATED_MESSAGE: &str = "Could not validate credentials";

/// Why a bearer token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("token signature is invalid or the token is malformed")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is missing required claims")]
    MalformedClaim,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no credential stored for username")]
    CredentialNotFound,

    #[error("password does not match stored credential")]
    PasswordMismatch,

    #[error(transparent)]
    Token(#[from] TokenRejection),

    #[error("credential store unavailable: {0}")]
    StorageUnavailable(#[source] anyhow::Error),

    #[error("token could not be issued: {0}")]
    TokenIssue(String),
}

impl From<AuthError> for ServiceError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::CredentialNotFound | AuthError::PasswordMismatch => {
                ServiceError::unauthenticated(LOGIN_FAILED_MESSAGE)
            }
            AuthError::Token(_) => ServiceError::unauthenticated(UNAUTHENTICATED_MESSAGE),
            AuthError::StorageUnavailable(source) => ServiceError::Database { source },
            AuthError::TokenIssue(message) => ServiceError::internal_error(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_message(error: AuthError) -> String {
        match ServiceError::from(error) {
            ServiceError::Unauthenticated { message } => message,
            other => panic!("expected unauthenticated, got {other:?}"),
        }
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        assert_eq!(
            client_message(AuthError::CredentialNotFound),
            client_message(AuthError::PasswordMismatch)
        );
    }

    #[test]
    fn test_token_failures_are_indistinguishable() {
        let messages: Vec<String> = [
            TokenRejection::InvalidSignature,
            TokenRejection::Expired,
            TokenRejection::MalformedClaim,
        ]
        .into_iter()
        .map(|rejection| client_message(rejection.into()))
        .collect();

        assert!(messages.iter().all(|m| m == UNAUTHENTICATED_MESSAGE));
    }

    #[test]
    fn test_storage_failure_is_not_an_auth_failure() {
        let error = AuthError::StorageUnavailable(anyhow::anyhow!("pool timed out"));
        assert!(matches!(
            ServiceError::from(error),
            ServiceError::Database { .. }
        ));
    }
}
