//! Database repository for marketplace items.
//!
//! Ownership scoping happens here: every query that touches a single item
//! for a caller filters on `user_id` as well as `id`.

use crate::database::models::{CreateItem, Item, ItemStatus, UpdateItem};
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;

const ITEM_COLUMNS: &str =
    "id, name, price, description, status, created_at, updated_at, user_id";

pub struct ItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists every item, newest id last.
    pub async fn find_all(&self) -> Result<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await
        .context("listing items")?;

        Ok(items)
    }

    /// Retrieves an item owned by `user_id`.
    pub async fn find_by_id(&self, id: i64, user_id: i64) -> Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await
        .context("fetching item")?;

        Ok(item)
    }

    /// Substring match on item name.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Item>> {
        let pattern = format!("%{}%", escape_like(name));
        let items = sqlx::query_as::<_, Item>(&format!(
            r#"SELECT {ITEM_COLUMNS} FROM items WHERE name LIKE ? ESCAPE '\' ORDER BY id"#
        ))
        .bind(pattern)
        .fetch_all(self.pool)
        .await
        .context("searching items")?;

        Ok(items)
    }

    pub async fn create(&self, item: CreateItem, user_id: i64) -> Result<Item> {
        let now = Utc::now();
        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (name, price, description, status, created_at, updated_at, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.description)
        .bind(ItemStatus::OnSale)
        .bind(now)
        .bind(now)
        .bind(user_id)
        .fetch_one(self.pool)
        .await
        .context("inserting item")?;

        Ok(item)
    }

    /// Applies the present fields of `update` to an item owned by `user_id`.
    ///
    /// # Returns
    /// `None` if no such item exists for this owner
    pub async fn update(&self, id: i64, update: UpdateItem, user_id: i64) -> Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items SET
                name = COALESCE(?, name),
                price = COALESCE(?, price),
                description = COALESCE(?, description),
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ? AND user_id = ?
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(update.name)
        .bind(update.price)
        .bind(update.description)
        .bind(update.status)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await
        .context("updating item")?;

        Ok(item)
    }

    /// Deletes an item owned by `user_id` and returns it.
    pub async fn delete(&self, id: i64, user_id: i64) -> Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "DELETE FROM items WHERE id = ? AND user_id = ? RETURNING {ITEM_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await
        .context("deleting item")?;

        Ok(item)
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::database::models::CreateUser;
    use crate::repositories::user_repository::UserRepository;

    async fn seeded() -> (Database, i64, i64) {
        let db = Database::in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        let mut ids = Vec::new();
        for name in ["alice", "bob"] {
            let user = users
                .create_user(CreateUser {
                    username: name.to_string(),
                    password_hash: "00".repeat(32),
                    salt: "c2FsdA==".to_string(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        (db, ids[0], ids[1])
    }

    fn pc(name: &str, price: i64) -> CreateItem {
        CreateItem {
            name: name.to_string(),
            price,
            description: Some("test item".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_scope_by_owner() {
        let (db, alice, bob) = seeded().await;
        let repo = ItemRepository::new(db.pool());

        let item = repo.create(pc("PC1", 10000), alice).await.unwrap();
        assert_eq!(item.status, ItemStatus::OnSale);
        assert_eq!(item.user_id, alice);

        assert!(repo.find_by_id(item.id, alice).await.unwrap().is_some());
        assert!(repo.find_by_id(item.id, bob).await.unwrap().is_none());
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_name_is_substring() {
        let (db, alice, _) = seeded().await;
        let repo = ItemRepository::new(db.pool());

        repo.create(pc("PC1", 10000), alice).await.unwrap();
        repo.create(pc("PC2", 20000), alice).await.unwrap();
        repo.create(pc("Phone", 30000), alice).await.unwrap();

        assert_eq!(repo.find_by_name("PC").await.unwrap().len(), 2);
        assert_eq!(repo.find_by_name("PC1").await.unwrap().len(), 1);
        assert!(repo.find_by_name("P%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (db, alice, bob) = seeded().await;
        let repo = ItemRepository::new(db.pool());
        let item = repo.create(pc("PC1", 10000), alice).await.unwrap();

        let update = UpdateItem {
            price: Some(5000),
            status: Some(ItemStatus::SoldOut),
            ..Default::default()
        };
        let updated = repo.update(item.id, update.clone(), alice).await.unwrap().unwrap();
        assert_eq!(updated.name, "PC1");
        assert_eq!(updated.price, 5000);
        assert_eq!(updated.status, ItemStatus::SoldOut);
        assert_eq!(updated.description.as_deref(), Some("test item"));

        assert!(repo.update(item.id, update, bob).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_only_own_items() {
        let (db, alice, bob) = seeded().await;
        let repo = ItemRepository::new(db.pool());
        let item = repo.create(pc("PC1", 10000), alice).await.unwrap();

        assert!(repo.delete(item.id, bob).await.unwrap().is_none());
        let deleted = repo.delete(item.id, alice).await.unwrap().unwrap();
        assert_eq!(deleted.id, item.id);
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
