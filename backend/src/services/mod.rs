//! Module for core business logic services.
//!
//! Services validate input, enforce ownership rules and translate repository
//! results into `ServiceError`s for the HTTP layer.

pub mod item_service;
pub mod user_service;
