//! Core business logic for the authentication system.
//!
//! `AuthService` owns the password hashing policy, credential verification
//! and the access token lifecycle. Everything else in the backend reaches it
//! through two questions: "are these credentials right?" (`login`,
//! `verify_credentials`) and "who sent this token?" (`authenticate_token`).

use std::sync::Arc;

use chrono::Duration;
use validator::Validate;

use crate::auth::errors::{AuthError, TokenRejection};
use crate::auth::models::{LoginRequest, LoginResponse};
use crate::auth::store::CredentialStore;
use crate::config::AuthConfig;
use crate::errors::{ServiceError, ServiceResult};
use crate::utils::clock::Clock;
use crate::utils::crypto::{HashedPassword, PasswordHasher};
use crate::utils::jwt::{IdentityClaim, JwtUtils};

/// A user whose password has just been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
}

/// Authentication service for credential checks and token handling
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    jwt_utils: JwtUtils,
    access_token_ttl: Duration,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(
        config: &AuthConfig,
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        AuthService {
            store,
            hasher: PasswordHasher::new(config.password_hash_iterations),
            jwt_utils: JwtUtils::new(&config.jwt_secret, clock),
            access_token_ttl: config.access_token_ttl,
        }
    }

    pub fn hash_password(&self, plaintext: &str) -> HashedPassword {
        self.hasher.hash_password(plaintext)
    }

    /// Checks a username/password pair against the credential store.
    ///
    /// An unknown username still pays for one KDF run so it cannot be told
    /// apart from a wrong password by timing.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let stored = self
            .store
            .get_by_username(username)
            .await
            .map_err(AuthError::StorageUnavailable)?;

        let Some(stored) = stored else {
            self.hasher.burn(password);
            return Err(AuthError::CredentialNotFound);
        };

        if !self.hasher.verify(&stored.credential, password) {
            return Err(AuthError::PasswordMismatch);
        }

        Ok(AuthenticatedUser {
            user_id: stored.user_id,
            username: stored.credential.username,
        })
    }

    pub fn issue_token(
        &self,
        username: &str,
        user_id: i64,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        self.jwt_utils.issue_token(username, user_id, ttl)
    }

    pub fn decode_token(&self, token: &str) -> Result<IdentityClaim, TokenRejection> {
        self.jwt_utils.decode_token(token)
    }

    /// Authenticate user and issue an access token
    pub async fn login(&self, login_request: LoginRequest) -> ServiceResult<LoginResponse> {
        if let Err(validation_errors) = login_request.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let user = match self
            .verify_credentials(&login_request.username, &login_request.password)
            .await
        {
            Ok(user) => user,
            Err(error @ AuthError::StorageUnavailable(_)) => {
                tracing::error!("Login for '{}' aborted: {}", login_request.username, error);
                return Err(error.into());
            }
            Err(error) => {
                tracing::warn!("Login failed for '{}': {}", login_request.username, error);
                return Err(error.into());
            }
        };

        let access_token = self
            .jwt_utils
            .issue_token(&user.username, user.user_id, self.access_token_ttl)?;

        tracing::info!("User '{}' logged in", user.username);
        Ok(LoginResponse::bearer(access_token))
    }

    /// Resolves a bearer token to the calling identity.
    ///
    /// The rejection reason is logged here and replaced by a generic
    /// unauthenticated error for the caller.
    pub fn authenticate_token(&self, token: &str) -> ServiceResult<IdentityClaim> {
        self.jwt_utils.decode_token(token).map_err(|rejection| {
            tracing::warn!("Rejected bearer token: {}", rejection);
            AuthError::from(rejection).into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::errors::{LOGIN_FAILED_MESSAGE, UNAUTHENTICATED_MESSAGE};
    use crate::auth::store::testing::{InMemoryCredentialStore, UnavailableCredentialStore};
    use crate::utils::clock::ManualClock;
    use crate::utils::crypto::Credential;
    use chrono::{TimeZone, Utc};

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test_secret_key_for_testing_purposes_only".to_string(),
            access_token_ttl: Duration::minutes(20),
            password_hash_iterations: 1000,
        }
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap(),
        ))
    }

    fn service_with_alice(clock: Arc<ManualClock>) -> AuthService {
        let store = Arc::new(InMemoryCredentialStore::default());
        let hasher = PasswordHasher::new(auth_config().password_hash_iterations);
        store.insert(1, Credential::new("alice", hasher.hash_password("password123")));
        AuthService::new(&auth_config(), store, clock)
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn unauthenticated_message(error: ServiceError) -> String {
        match error {
            ServiceError::Unauthenticated { message } => message,
            other => panic!("expected unauthenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let service = service_with_alice(clock());

        let user = service.verify_credentials("alice", "password123").await.unwrap();
        assert_eq!(
            user,
            AuthenticatedUser {
                user_id: 1,
                username: "alice".to_string()
            }
        );

        assert!(matches!(
            service.verify_credentials("alice", "wrongpass").await,
            Err(AuthError::PasswordMismatch)
        ));
        assert!(matches!(
            service.verify_credentials("bob", "password123").await,
            Err(AuthError::CredentialNotFound)
        ));
    }

    #[tokio::test]
    async fn test_login_issues_decodable_token() {
        let service = service_with_alice(clock());

        let response = service
            .login(login_request("alice", "password123"))
            .await
            .unwrap();
        assert_eq!(response.token_type, "bearer");

        let identity = service.authenticate_token(&response.access_token).unwrap();
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.user_id, 1);
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let service = service_with_alice(clock());

        let wrong_password = service
            .login(login_request("alice", "wrongpass"))
            .await
            .unwrap_err();
        let unknown_user = service
            .login(login_request("bob", "anything"))
            .await
            .unwrap_err();

        let wrong_password = unauthenticated_message(wrong_password);
        assert_eq!(wrong_password, LOGIN_FAILED_MESSAGE);
        assert_eq!(wrong_password, unauthenticated_message(unknown_user));
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields() {
        let service = service_with_alice(clock());

        let error = service.login(login_request("", "")).await.unwrap_err();
        assert!(matches!(error, ServiceError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_reported_as_bad_credentials() {
        let service = AuthService::new(
            &auth_config(),
            Arc::new(UnavailableCredentialStore),
            clock(),
        );

        assert!(matches!(
            service.verify_credentials("alice", "password123").await,
            Err(AuthError::StorageUnavailable(_))
        ));
        assert!(matches!(
            service.login(login_request("alice", "password123")).await,
            Err(ServiceError::Database { .. })
        ));
    }

    #[tokio::test]
    async fn test_token_expires_after_configured_ttl() {
        let clock = clock();
        let service = service_with_alice(clock.clone());

        let response = service
            .login(login_request("alice", "password123"))
            .await
            .unwrap();

        clock.advance(Duration::minutes(20) - Duration::seconds(1));
        assert!(service.authenticate_token(&response.access_token).is_ok());

        clock.advance(Duration::seconds(2));
        assert_eq!(
            service.decode_token(&response.access_token),
            Err(TokenRejection::Expired)
        );
        let error = service
            .authenticate_token(&response.access_token)
            .unwrap_err();
        assert_eq!(unauthenticated_message(error), UNAUTHENTICATED_MESSAGE);
    }

    #[tokio::test]
    async fn test_issue_token_with_custom_ttl() {
        let clock = clock();
        let service = service_with_alice(clock.clone());

        let token = service.issue_token("alice", 1, Duration::seconds(30)).unwrap();
        assert!(service.decode_token(&token).is_ok());

        clock.advance(Duration::seconds(31));
        assert_eq!(service.decode_token(&token), Err(TokenRejection::Expired));
    }
}
