//! Credential lookup capability used by the authentication core.
//!
//! The auth core only ever needs "get credential by username"; keeping that
//! behind a trait lets tests swap in failing or in-memory stores.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::repositories::user_repository::UserRepository;
use crate::utils::crypto::Credential;

/// A credential together with the id of the user that owns it.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub user_id: i64,
    pub credential: Credential,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the stored credential for `username`, if any.
    async fn get_by_username(&self, username: &str) -> anyhow::Result<Option<StoredCredential>>;
}

/// `CredentialStore` backed by the `users` table.
#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn get_by_username(&self, username: &str) -> anyhow::Result<Option<StoredCredential>> {
        let user = UserRepository::new(&self.pool)
            .get_user_by_username(username)
            .await?;

        Ok(user.map(|user| StoredCredential {
            user_id: user.id,
            credential: Credential {
                username: user.username,
                password_hash: user.password_hash,
                salt: user.salt,
            },
        }))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::database::models::CreateUser;

    #[tokio::test]
    async fn test_sqlite_store_maps_user_row() {
        let db = Database::in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create_user(CreateUser {
                username: "alice".to_string(),
                password_hash: "ff".repeat(32),
                salt: "c2FsdA==".to_string(),
            })
            .await
            .unwrap();

        let store = SqliteCredentialStore::new(db.pool().clone());
        let stored = store.get_by_username("alice").await.unwrap().unwrap();

        assert_eq!(stored.user_id, user.id);
        assert_eq!(stored.credential.username, "alice");
        assert_eq!(stored.credential.password_hash, "ff".repeat(32));
        assert_eq!(stored.credential.salt, "c2FsdA==");

        assert!(store.get_by_username("bob").await.unwrap().is_none());
    }
}
