//! User business logic service.
//!
//! Handles signup and user lookup. Password hashing is delegated to the
//! authentication core so there is a single hashing policy.

use crate::auth::models::SignupRequest;
use crate::auth::service::AuthService;
use crate::database::models::{CreateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::{UserRepository, is_unique_violation};
use sqlx::SqlitePool;
use validator::Validate;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
    auth: &'a AuthService,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    /// * `auth` - Authentication core used to hash new passwords
    pub fn new(pool: &'a SqlitePool, auth: &'a AuthService) -> Self {
        Self { pool, auth }
    }

    /// Registers a new user.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Validation failures (username under 2 or password under 8 characters)
    /// - A username that is already taken
    pub async fn create_user(&self, signup: SignupRequest) -> ServiceResult<User> {
        if let Err(validation_errors) = signup.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let hashed = self.auth.hash_password(&signup.password);

        let data = CreateUser {
            username: signup.username.clone(),
            password_hash: hashed.hash,
            salt: hashed.salt,
        };

        // Duplicate names are caught by the UNIQUE constraint, not a pre-check.
        let user = match UserRepository::new(self.pool).create_user(data).await {
            Ok(user) => user,
            Err(error) if is_unique_violation(&error) => {
                tracing::warn!("Signup rejected: username '{}' is taken", signup.username);
                return Err(ServiceError::already_exists("User", &signup.username));
            }
            Err(error) => return Err(error.into()),
        };
        tracing::info!("Created user '{}' with id {}", user.username, user.id);
        Ok(user)
    }

    /// Retrieves a user by ID with existence verification.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if user doesn't exist
    pub async fn get_user_required(&self, id: i64) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id.to_string()))?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::SqliteCredentialStore;
    use crate::config::AuthConfig;
    use crate::database::Database;
    use crate::utils::clock::SystemClock;
    use std::sync::Arc;

    fn auth_service(db: &Database) -> AuthService {
        AuthService::new(
            &AuthConfig {
                jwt_secret: "secret".to_string(),
                access_token_ttl: chrono::Duration::minutes(20),
                password_hash_iterations: 1000,
            },
            Arc::new(SqliteCredentialStore::new(db.pool().clone())),
            Arc::new(SystemClock),
        )
    }

    fn signup(username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_stores_salted_hash() {
        let db = Database::in_memory().await.unwrap();
        let auth = auth_service(&db);
        let service = UserService::new(db.pool(), &auth);

        let user = service
            .create_user(signup("alice", "password123"))
            .await
            .unwrap();

        assert_ne!(user.password_hash, "password123");
        assert_eq!(user.password_hash.len(), 64);
        assert!(!user.salt.is_empty());
        assert!(auth.verify_credentials("alice", "password123").await.is_ok());
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicates_and_short_input() {
        let db = Database::in_memory().await.unwrap();
        let auth = auth_service(&db);
        let service = UserService::new(db.pool(), &auth);

        service
            .create_user(signup("alice", "password123"))
            .await
            .unwrap();

        assert!(matches!(
            service.create_user(signup("alice", "password456")).await,
            Err(ServiceError::AlreadyExists { .. })
        ));
        assert!(matches!(
            service.create_user(signup("a", "password123")).await,
            Err(ServiceError::Validation { .. })
        ));
        assert!(matches!(
            service.create_user(signup("carol", "short")).await,
            Err(ServiceError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_username_taken_behind_the_service_is_a_conflict() {
        let db = Database::in_memory().await.unwrap();
        let auth = auth_service(&db);
        let service = UserService::new(db.pool(), &auth);

        UserRepository::new(db.pool())
            .create_user(CreateUser {
                username: "alice".to_string(),
                password_hash: "ab".repeat(32),
                salt: "c2FsdA==".to_string(),
            })
            .await
            .unwrap();

        let error = service
            .create_user(signup("alice", "password123"))
            .await
            .unwrap_err();
        match error {
            ServiceError::AlreadyExists { entity, identifier } => {
                assert_eq!(entity, "User");
                assert_eq!(identifier, "alice");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_user_required() {
        let db = Database::in_memory().await.unwrap();
        let auth = auth_service(&db);
        let service = UserService::new(db.pool(), &auth);

        let user = service
            .create_user(signup("alice", "password123"))
            .await
            .unwrap();

        assert_eq!(
            service.get_user_required(user.id).await.unwrap().username,
            "alice"
        );
        assert!(matches!(
            service.get_user_required(user.id + 1).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
