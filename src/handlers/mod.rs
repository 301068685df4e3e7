//! HTTP request handlers (route handlers).
//!
//! Each handler receives request data, calls into the services, and returns
//! a JSON response or an `AppError`.

/// API key endpoints
pub mod api_keys;
/// Health check endpoint
pub mod health;
