//! Business logic services.
//!
//! Services hold the database logic, separated from HTTP handlers.

pub mod api_key_service;
