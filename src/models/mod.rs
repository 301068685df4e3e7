//! Data models representing database entities.

/// API key record and token budget model
pub mod api_key;
