//! Item business logic service.
//!
//! Every mutating operation takes the caller's user id, which handlers take
//! from a verified token, never from the request body.

use crate::database::models::{CreateItem, Item, UpdateItem};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::item_repository::ItemRepository;
use sqlx::SqlitePool;
use validator::Validate;

pub struct ItemService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Item>> {
        Ok(ItemRepository::new(self.pool).find_all().await?)
    }

    /// Substring search on item name. `name` must be 2-20 characters.
    pub async fn find_by_name(&self, name: &str) -> ServiceResult<Vec<Item>> {
        let length = name.chars().count();
        if !(2..=20).contains(&length) {
            return Err(ServiceError::validation(
                "name: Search term must be between 2-20 characters",
            ));
        }

        Ok(ItemRepository::new(self.pool).find_by_name(name).await?)
    }

    /// Retrieves one of the caller's own items.
    pub async fn find_by_id(&self, id: i64, user_id: i64) -> ServiceResult<Item> {
        ItemRepository::new(self.pool)
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item", id.to_string()))
    }

    pub async fn create(&self, item: CreateItem, user_id: i64) -> ServiceResult<Item> {
        if let Err(validation_errors) = item.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let item = ItemRepository::new(self.pool).create(item, user_id).await?;
        tracing::info!("User {} listed item {} ({})", user_id, item.id, item.status);
        Ok(item)
    }

    pub async fn update(&self, id: i64, update: UpdateItem, user_id: i64) -> ServiceResult<Item> {
        if let Err(validation_errors) = update.validate() {
            return Err(ServiceError::from_validation_errors(&validation_errors));
        }

        let item = ItemRepository::new(self.pool)
            .update(id, update, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item", id.to_string()))?;
        tracing::info!("User {} updated item {} ({})", user_id, item.id, item.status);
        Ok(item)
    }

    pub async fn delete(&self, id: i64, user_id: i64) -> ServiceResult<Item> {
        let item = ItemRepository::new(self.pool)
            .delete(id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Item", id.to_string()))?;
        tracing::info!("User {} deleted item {}", user_id, item.id);
        Ok(item)
    }
}
