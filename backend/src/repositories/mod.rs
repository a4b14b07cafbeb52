//! Data access layer over the SQLite pool.

pub mod item_repository;
pub mod user_repository;
