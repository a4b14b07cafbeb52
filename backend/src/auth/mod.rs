//! Authentication module for managing user credentials and access tokens.
//!
//! This module provides the public interface for authentication-related
//! functionality: signup, login, token verification and the middleware that
//! guards protected routes.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
