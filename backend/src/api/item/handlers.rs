//! Handler functions for marketplace item API endpoints.
//!
//! Protected handlers read the caller from the `IdentityClaim` placed in the
//! request extensions by `jwt_auth`.

use crate::api::common::{error_response, service_error_to_http};
use crate::database::models::{CreateItem, Item, UpdateItem};
use crate::errors::ServiceError;
use crate::services::item_service::ItemService;
use crate::utils::jwt::IdentityClaim;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;

type ItemResult<T> = Result<T, (StatusCode, String)>;

#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    /// Optional substring to search for in item names
    pub name: Option<String>,
}

/// Lists all items, or searches by name when `?name=` is given.
#[axum::debug_handler]
pub async fn list_items(
    Extension(pool): Extension<SqlitePool>,
    Query(query): Query<ItemListQuery>,
) -> ItemResult<ResponseJson<Vec<Item>>> {
    let service = ItemService::new(&pool);

    let result = match query.name.as_deref() {
        Some(name) => service.find_by_name(name).await,
        None => service.find_all().await,
    };

    match result {
        Ok(items) => Ok(ResponseJson(items)),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Retrieves one of the caller's items by ID.
#[axum::debug_handler]
pub async fn get_item(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<IdentityClaim>,
    Path(id): Path<i64>,
) -> ItemResult<ResponseJson<Item>> {
    let id = positive_id(id)?;
    let service = ItemService::new(&pool);

    match service.find_by_id(id, claims.user_id()).await {
        Ok(item) => Ok(ResponseJson(item)),
        Err(error) => Err(item_error(error, "Item not found")),
    }
}

/// Lists a new item with the caller as seller.
#[axum::debug_handler]
pub async fn create_item(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<IdentityClaim>,
    Json(payload): Json<CreateItem>,
) -> ItemResult<(StatusCode, ResponseJson<Item>)> {
    let service = ItemService::new(&pool);

    match service.create(payload, claims.user_id()).await {
        Ok(item) => Ok((StatusCode::CREATED, ResponseJson(item))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Updates one of the caller's items.
#[axum::debug_handler]
pub async fn update_item(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<IdentityClaim>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateItem>,
) -> ItemResult<ResponseJson<Item>> {
    let id = positive_id(id)?;
    let service = ItemService::new(&pool);

    match service.update(id, payload, claims.user_id()).await {
        Ok(item) => Ok(ResponseJson(item)),
        Err(error) => Err(item_error(error, "Item not updated")),
    }
}

/// Deletes one of the caller's items and returns it.
#[axum::debug_handler]
pub async fn delete_item(
    Extension(pool): Extension<SqlitePool>,
    Extension(claims): Extension<IdentityClaim>,
    Path(id): Path<i64>,
) -> ItemResult<ResponseJson<Item>> {
    let id = positive_id(id)?;
    let service = ItemService::new(&pool);

    match service.delete(id, claims.user_id()).await {
        Ok(item) => Ok(ResponseJson(item)),
        Err(error) => Err(item_error(error, "Item not deleted")),
    }
}

fn positive_id(id: i64) -> ItemResult<i64> {
    if id < 1 {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "id: must be greater than 0",
            "validation_error",
        ));
    }
    Ok(id)
}

/// Item lookups that miss answer with a fixed message instead of echoing the id.
fn item_error(error: ServiceError, not_found_message: &str) -> (StatusCode, String) {
    match error {
        ServiceError::NotFound { .. } => {
            error_response(StatusCode::NOT_FOUND, not_found_message, "not_found")
        }
        other => service_error_to_http(other),
    }
}
