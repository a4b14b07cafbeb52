//! Module for marketplace item API endpoints.
//!
//! Listing and search are public; reading, creating, updating and deleting a
//! specific item require a bearer token and act only on the caller's items.

pub mod handlers;
pub mod routes;
