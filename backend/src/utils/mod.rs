//! Collection of general utility functions and common traits.
//!
//! Password hashing, token encoding and the time source live here so the
//! auth core can be assembled from small, separately tested pieces.

pub mod clock;
pub mod crypto;
pub mod jwt;
