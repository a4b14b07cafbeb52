//! Defines the HTTP routes for marketplace items.

use super::handlers::{create_item, delete_item, get_item, list_items, update_item};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn item_router() -> Router {
    Router::new()
        .route("/", get(list_items))
        .route(
            "/",
            post(create_item).layer(middleware::from_fn(jwt_auth)),
        )
        .route(
            "/{id}",
            get(get_item)
                .put(update_item)
                .delete(delete_item)
                .layer(middleware::from_fn(jwt_auth)),
        )
}
