//! Central module for organizing the application's main API endpoints.
//!
//! Authentication routes live in `crate::auth`; this module holds the
//! marketplace resources, the shared response helpers and the router that
//! ties everything together.

pub mod common;
pub mod item;
pub mod router;
pub mod timing;
