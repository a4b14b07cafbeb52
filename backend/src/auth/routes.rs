//! HTTP routes for signup, login and the current-user lookup.
//!
//! Nested into the main router under `/auth`. Only `/me` sits behind
//! `jwt_auth`; signup and login are how a caller gets a token at all.

use crate::auth::handlers::{login, me, signup};
use crate::auth::middleware::jwt_auth;
use axum::{
    Router, middleware,
    routing::{get, post},
};

pub fn auth_router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(me).layer(middleware::from_fn(jwt_auth)))
}
